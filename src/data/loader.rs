//! JSON row loading

use std::fs;
use std::path::Path;

use crate::core::{ChainError, ChainResult, OptionChainData, OptionRow};

/// Status string of a successful query result
pub const QUERY_SUCCESS: &str = "Success";

/// Parse a query result wrapper or a bare array of rows.
///
/// The shape is picked from the first token so serde errors keep their
/// line and column.
pub fn parse_chain_data(json: &str) -> ChainResult<OptionChainData> {
    let data = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<OptionRow>>(json).map(OptionChainData::from_rows)
    } else {
        serde_json::from_str::<OptionChainData>(json)
    }
    .map_err(|e| ChainError::Serialization(format!("Failed to parse option rows: {}", e)))?;

    if !data.query_execution_status.is_empty() && data.query_execution_status != QUERY_SUCCESS {
        tracing::warn!(
            "Query result status {:?}: {}",
            data.query_execution_status,
            data.query_execution_message
        );
    }

    Ok(data)
}

pub fn parse_rows(json: &str) -> ChainResult<Vec<OptionRow>> {
    parse_chain_data(json).map(|data| data.rows)
}

/// Load a query result file
pub fn load_chain_data(path: impl AsRef<Path>) -> ChainResult<OptionChainData> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let data = parse_chain_data(&json)?;

    tracing::info!("Loaded {} option rows from {:?}", data.rows.len(), path);
    Ok(data)
}

pub fn load_rows(path: impl AsRef<Path>) -> ChainResult<Vec<OptionRow>> {
    load_chain_data(path).map(|data| data.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionSide;
    use tempfile::tempdir;

    const ROW_PUT: &str = r#"{"date": "2024-01-02", "act_symbol": "AAPL", "expiration": "2024-01-19",
        "strike": "180.00", "call_put": "Put", "bid": "1.10", "ask": "1.15", "vol": "0.21",
        "delta": "-0.30", "gamma": "0.04", "theta": "-0.09", "vega": "0.15", "rho": "-0.02"}"#;
    const ROW_CALL: &str = r#"{"date": "2024-01-02", "act_symbol": "AAPL", "expiration": "2024-01-19",
        "strike": "180.00", "call_put": "Call", "bid": "6.10", "ask": "6.20", "vol": "0.20",
        "delta": "0.70", "gamma": "0.04", "theta": "-0.11", "vega": "0.15", "rho": "0.05"}"#;

    #[test]
    fn test_parse_wrapper() {
        let json = format!(
            r#"{{
                "query_execution_status": "Success",
                "query_execution_message": "",
                "repository_owner": "post-no-preference",
                "repository_name": "options",
                "commit_ref": "master",
                "sql_query": "SELECT * FROM option_chain",
                "schema": [{{"columnName": "date", "columnType": "date"}}],
                "rows": [{}, {}]
            }}"#,
            ROW_CALL, ROW_PUT
        );

        let data = parse_chain_data(&json).unwrap();
        assert_eq!(data.repository_name, "options");
        assert_eq!(data.schema[0].column_name, "date");
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0].side, OptionSide::Call);
    }

    #[test]
    fn test_parse_bare_array() {
        let rows = parse_rows(&format!("[{}, {}]", ROW_PUT, ROW_CALL)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].side, OptionSide::Put);
        assert_eq!(rows[1].bid, "6.10");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_rows(r#"{"rows": "nope"}"#).unwrap_err();
        assert!(matches!(err, ChainError::Serialization(_)));

        let err = parse_rows("{not json").unwrap_err();
        assert!(matches!(err, ChainError::Serialization(_)));
    }

    #[test]
    fn test_parse_error_keeps_position() {
        let bad_date = ROW_CALL.replace("\"date\": \"2024-01-02\"", "\"date\": \"2024-13-45\"");
        assert_ne!(bad_date, ROW_CALL);

        let err = parse_rows(&format!("{{\"rows\": [\n{},\n{}]}}", ROW_PUT, bad_date)).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ChainError::Serialization(_)));
        assert!(!msg.contains("untagged"), "{}", msg);
        // ROW_PUT spans lines 2-4, the bad row starts on line 5
        assert!(msg.contains("line 5"), "{}", msg);

        let err = parse_rows(&format!("[{}]", ROW_PUT.replace("\"Put\"", "\"Straddle\""))).unwrap_err();
        assert!(err.to_string().contains("Straddle"), "{}", err);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("option_chain.json");
        fs::write(&path, format!(r#"{{"rows": [{}]}}"#, ROW_CALL)).unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "AAPL");

        let missing = load_rows(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ChainError::IO(_)));
    }
}
