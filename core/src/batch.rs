use crate::document::ScoredDocument;
use crate::error::Result;
use crate::server::SearchServer;
use rayon::prelude::*;

/// Run independent queries concurrently. Results come back in query order;
/// the first failing query fails the whole batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<ScoredDocument>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect()
}

/// Like [`process_queries`], flattened into one list.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<ScoredDocument>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;
    use crate::error::Error;

    fn server() -> SearchServer {
        let mut server = SearchServer::new("and with").unwrap();
        let texts = [
            "funny pet and nasty rat",
            "funny pet with curly hair",
            "funny pet and not very nasty rat",
            "pet with rat and rat and rat",
            "nasty rat with curly hair",
        ];
        for (id, text) in (1..).zip(texts) {
            server.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        server
    }

    #[test]
    fn results_keep_query_order() {
        let server = server();
        let queries = ["nasty rat -not", "not very funny nasty pet", "curly hair"];
        let results = process_queries(&server, &queries).unwrap();
        let sizes: Vec<_> = results.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 5, 2]);
        for (query, batch) in queries.iter().zip(&results) {
            assert_eq!(&server.find_top_documents(query).unwrap(), batch);
        }
    }

    #[test]
    fn joined_results_are_concatenated() {
        let server = server();
        let queries = ["curly hair", "nasty rat -not"];
        let joined = process_queries_joined(&server, &queries).unwrap();
        assert_eq!(joined.len(), 5);
        assert!(joined[..2].iter().all(|d| d.id == 2 || d.id == 5));
    }

    #[test]
    fn a_bad_query_fails_the_batch() {
        let server = server();
        let err = process_queries(&server, &["rat", "- rat"]).unwrap_err();
        assert_eq!(err, Error::MalformedExclusion("-".into()));
    }
}
