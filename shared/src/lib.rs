pub mod config;
pub mod events;
pub mod telemetry;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_rekognition::Client as RekognitionClient;
use aws_sdk_s3::Client as S3Client;
use gallery_atoms::records::DynamoImageTable;
use gallery_atoms::storage::S3ObjectStore;
use gallery_atoms::vision::RekognitionAnalyzer;

/// AWS clients, built once per cold start and shared by every invocation.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub rekognition_client: RekognitionClient,
}

impl AppState {
    /// Load region and credentials from the Lambda environment
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        AppState {
            dynamo_client: DynamoClient::new(&config),
            s3_client: S3Client::new(&config),
            rekognition_client: RekognitionClient::new(&config),
        }
    }

    pub fn image_table(&self, table_name: &str) -> DynamoImageTable {
        DynamoImageTable::new(self.dynamo_client.clone(), table_name)
    }

    pub fn object_store(&self) -> S3ObjectStore {
        S3ObjectStore::new(self.s3_client.clone())
    }

    pub fn analyzer(&self) -> RekognitionAnalyzer {
        RekognitionAnalyzer::new(self.rekognition_client.clone())
    }
}
