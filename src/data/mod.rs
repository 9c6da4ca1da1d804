/// Data layer: the ingestion and filtering pipeline.
///
/// ```text
///   remote CSV (datos.gob.cl)
///        │
///        ▼
///   ┌───────┐
///   │ fetch  │  blocking GET, per-URL cache with TTL
///   └───────┘
///        │
///        ▼
///   ┌────────┐
///   │ decode  │  (encoding, separator) candidates → Table
///   └────────┘
///        │
///        ▼
///   ┌─────────┐
///   │ resolve  │  role → header bindings
///   └─────────┘
///        │
///        ▼
///   ┌────────┐
///   │ filter  │  query + per-role membership → row indices
///   └────────┘
///        │
///        ▼
///   aggregate (counts by región) / export (filtered CSV)
/// ```
pub mod fetch;

pub mod aggregate;
pub mod decode;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod resolve;

use self::error::DataError;
use self::fetch::{FetchCache, HttpClient};
use self::model::Dataset;

/// Run the whole pipeline for one URL: fetch (through the cache), decode,
/// reject empty tables, build the dataset with its derived indexes. Every
/// error is terminal for the current render cycle; nothing is partially
/// built.
pub fn load_dataset(
    cache: &mut FetchCache,
    client: &impl HttpClient,
    url: &str,
) -> Result<Dataset, DataError> {
    let bytes = cache.fetch(url, client)?;
    let table = decode::decode(&bytes)?;
    if table.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    Ok(Dataset::from_table(table))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::error::{DataError, FetchError};
    use super::fetch::{FetchCache, HttpClient};
    use super::resolve::Role;
    use super::*;

    struct StaticClient(Vec<u8>);

    impl HttpClient for StaticClient {
        fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn pipeline_builds_a_dataset_with_bindings() {
        let client = StaticClient(
            "Región;Comuna;Tipo;Teléfono\nMetropolitana;Santiago;Sucursal;22334455\n"
                .as_bytes()
                .to_vec(),
        );
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        let dataset = load_dataset(&mut cache, &client, "http://example/x.csv").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.bindings.get(Role::Region), Some("Región"));
        assert_eq!(dataset.bindings.get(Role::Ciudad), None);
    }

    #[test]
    fn header_only_payload_is_an_empty_dataset_error() {
        let client = StaticClient("Región,Comuna\n".as_bytes().to_vec());
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        let err = load_dataset(&mut cache, &client, "http://example/x.csv").unwrap_err();
        assert!(matches!(err, DataError::EmptyDataset));
    }

    #[test]
    fn undecodable_payload_surfaces_a_decode_error() {
        let client = StaticClient(b"solo\nuno\n".to_vec());
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        let err = load_dataset(&mut cache, &client, "http://example/x.csv").unwrap_err();
        assert!(matches!(err, DataError::Decode(_)));
    }
}
