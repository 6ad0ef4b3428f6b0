use serde::Deserialize;

/// One repository record as returned by the search API
///
/// The `id` is the API's stable external identifier; it is the primary key in
/// storage and the key for in-run deduplication. Records are never mutated
/// locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRecord {
    /// Stable external identifier (GraphQL node id)
    pub id: String,
    /// Repository name
    pub name: String,
    /// Owner login
    pub owner: String,
    /// Star count at fetch time
    pub stars: u64,
}

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Records on this page (null nodes already skipped)
    pub repos: Vec<RepoRecord>,
    /// Whether the API reports further pages for this query
    pub has_next_page: bool,
    /// Continuation cursor for the next page, if any
    pub end_cursor: Option<String>,
}

// ===== Wire format =====
//
// The shapes below mirror the GraphQL response:
//
//   { "data": { "search": {
//       "pageInfo": { "hasNextPage": ..., "endCursor": ... },
//       "nodes": [ { "id": ..., "name": ..., "stargazerCount": ...,
//                    "owner": { "login": ... } }, ... ] } } }

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    pub data: Option<DataBody>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataBody {
    pub search: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchBody {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<Option<RepoNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepoNode {
    pub id: String,
    pub name: String,
    pub stargazer_count: u64,
    pub owner: OwnerNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerNode {
    pub login: String,
}

impl SearchBody {
    /// Converts the wire shape into a `SearchPage`, dropping null nodes
    pub(crate) fn into_page(self) -> SearchPage {
        let repos = self
            .nodes
            .into_iter()
            .flatten()
            .map(|node| RepoRecord {
                id: node.id,
                name: node.name,
                owner: node.owner.login,
                stars: node.stargazer_count,
            })
            .collect();

        SearchPage {
            repos,
            has_next_page: self.page_info.has_next_page,
            end_cursor: self.page_info.end_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_page() {
        let body = r#"{
            "data": {
                "search": {
                    "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" },
                    "nodes": [
                        { "id": "R_1", "name": "alpha", "stargazerCount": 150,
                          "owner": { "login": "octocat" } },
                        null,
                        { "id": "R_2", "name": "beta", "stargazerCount": 180,
                          "owner": { "login": "hubber" } }
                    ]
                }
            }
        }"#;

        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        let page = response.data.unwrap().search.unwrap().into_page();

        // Null nodes are skipped
        assert_eq!(page.repos.len(), 2);
        assert_eq!(
            page.repos[0],
            RepoRecord {
                id: "R_1".to_string(),
                name: "alpha".to_string(),
                owner: "octocat".to_string(),
                stars: 150,
            }
        );
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("Y3Vyc29y"));
    }

    #[test]
    fn test_parse_last_page() {
        let body = r#"{
            "data": {
                "search": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "nodes": []
                }
            }
        }"#;

        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        let page = response.data.unwrap().search.unwrap().into_page();

        assert!(page.repos.is_empty());
        assert!(!page.has_next_page);
        assert!(page.end_cursor.is_none());
    }

    #[test]
    fn test_parse_error_payload() {
        let body = r#"{
            "data": null,
            "errors": [ { "message": "Something went wrong" } ]
        }"#;

        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Something went wrong");
    }
}
