#[cfg(feature = "huggingface")]
/// Hugging Face hub-backed provider that materializes local snapshots.
pub mod huggingface;
/// Local shard-file snapshot provider.
pub mod snapshot;
