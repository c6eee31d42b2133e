//! Substring filtering of normalized request tables.

use crate::requests::record::RequestTable;

impl RequestTable {
    /// Filters the table by a case-insensitive substring match on the
    /// description, keeping only rows that also have coordinates.
    ///
    /// A row survives iff its `description` contains `query` (case
    /// sensitivity is always off; a missing description never matches) and
    /// its `coordinates` are present, so every surviving row is safe for map
    /// placement. Surviving rows keep their relative order and are re-indexed
    /// from 0 in the new table; the source table is untouched.
    ///
    /// Filtering is idempotent: applying the same query to an
    /// already-filtered table returns an identical table.
    ///
    /// # Examples
    ///
    /// ```
    /// use oak311::{normalize_requests, RawRequest, RequestAddress};
    ///
    /// # fn main() -> Result<(), oak311::RequestDataError> {
    /// let raw: Vec<RawRequest> = serde_json::from_str(
    ///     r#"[{
    ///         "datetimeinit": "2024-01-15T09:23:41",
    ///         "description": "Pothole repair needed",
    ///         "reqaddress": {"latitude": 37.8, "longitude": -122.27}
    ///     }]"#,
    /// )
    /// .unwrap();
    ///
    /// let table = normalize_requests(raw)?;
    /// let potholes = table.filter_by_description("poth");
    /// assert_eq!(potholes.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter_by_description(&self, query: &str) -> RequestTable {
        let needle = query.to_lowercase();
        let rows = self
            .rows
            .iter()
            .filter(|row| row.coordinates.is_some())
            .filter(|row| {
                row.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        RequestTable { rows }
    }
}
