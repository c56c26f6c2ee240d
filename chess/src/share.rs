//! The kifu as a `kifu` query parameter of the hosting page's address.

use crate::history::History;
use crate::ChessError;
use url::Url;

pub const KIFU_PARAM: &str = "kifu";

/// Read the history carried by `address`. A missing parameter is an empty
/// history; an address that does not parse is `MalformedHistoryString`.
pub fn kifu_from_address(address: &str) -> Result<History, ChessError> {
    let url = Url::parse(address)
        .map_err(|e| ChessError::MalformedHistoryString(format!("{}: {}", address, e)))?;

    Ok(url
        .query_pairs()
        .find(|(key, _)| key == KIFU_PARAM)
        .map(|(_, value)| History::deserialize(&value))
        .unwrap_or_default())
}

/// Like [`kifu_from_address`], but degrades a malformed address to an empty
/// history.
pub fn kifu_from_address_lossy(address: &str) -> History {
    kifu_from_address(address).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable kifu address: {}", e);
        History::new()
    })
}

/// Rewrite `address` so that it carries `history`. Other query parameters
/// are kept; the parameter is dropped entirely when the history is empty.
pub fn address_with_kifu(address: &str, history: &History) -> Result<String, ChessError> {
    let mut url = Url::parse(address)
        .map_err(|e| ChessError::MalformedHistoryString(format!("{}: {}", address, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != KIFU_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() || !history.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
        if !history.is_empty() {
            query.append_pair(KIFU_PARAM, &history.serialize());
        }
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_kifu_param() {
        let history = kifu_from_address("http://localhost:8501/?kifu=e2e4+e7e5").unwrap();
        assert_eq!(history.serialize(), "e2e4 e7e5");

        let history = kifu_from_address("http://localhost:8501/?kifu=e2e4%20O-O").unwrap();
        assert_eq!(history.tokens(), ["e2e4", "O-O"]);
    }

    #[test]
    fn test_missing_param_is_empty() {
        let history = kifu_from_address("http://localhost:8501/?theme=dark").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_address() {
        assert!(matches!(
            kifu_from_address("not an address"),
            Err(ChessError::MalformedHistoryString(_))
        ));
        assert!(kifu_from_address_lossy("not an address").is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let history = History::deserialize("e2e4 e7e5 e7e8=Q O-O-O");
        let address = address_with_kifu("http://localhost:8501/?theme=dark", &history).unwrap();
        assert!(address.contains("theme=dark"));
        assert_eq!(kifu_from_address(&address).unwrap(), history);
    }

    #[test]
    fn test_empty_history_drops_param() {
        let address =
            address_with_kifu("http://localhost:8501/?kifu=e2e4", &History::new()).unwrap();
        assert_eq!(address, "http://localhost:8501/");
    }
}
