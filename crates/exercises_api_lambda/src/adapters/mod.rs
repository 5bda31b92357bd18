pub mod dynamodb;
pub mod link_signer;
pub mod s3;
pub mod table_store;
