use crate::error::Result;
use crate::server::SearchServer;
use crate::DocumentId;
use std::collections::BTreeSet;

/// Remove every document whose set of terms equals that of a document with a
/// smaller id. Term frequencies are ignored. Returns the removed ids in
/// ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Result<Vec<DocumentId>> {
    let duplicates = find_duplicates(server);
    for &id in &duplicates {
        server.remove_document(id)?;
        tracing::info!(id, "found duplicate document");
    }
    Ok(duplicates)
}

/// The ids [`remove_duplicates`] would remove, without removing them.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocumentId> {
    let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
    server
        .iter()
        .filter(|&id| {
            let words: Vec<&str> = server.get_term_frequencies(id).keys().map(String::as_str).collect();
            !seen.insert(words)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;

    #[test]
    fn keeps_first_of_each_vocabulary() {
        let mut server = SearchServer::new("and with").unwrap();
        let docs = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in docs {
            server.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        assert_eq!(server.document_count(), 9);

        let removed = remove_duplicates(&mut server).unwrap();
        assert_eq!(removed, vec![3, 4, 5, 7]);
        assert_eq!(server.document_count(), 5);
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn nothing_to_do_on_small_corpora() {
        let mut server = SearchServer::default();
        assert!(remove_duplicates(&mut server).unwrap().is_empty());
        server.add_document(1, "lonely", DocumentStatus::Actual, &[]).unwrap();
        assert!(remove_duplicates(&mut server).unwrap().is_empty());
    }
}
