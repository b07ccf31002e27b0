use uuid::Uuid;

use super::errors::follow_error::FollowError;

/// Parses a user id taken from a request path.
pub fn parse_user_id(raw: &str) -> Result<Uuid, FollowError> {
    Uuid::parse_str(raw.trim()).map_err(|_| FollowError::InvalidUserId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_id() {
        let err = parse_user_id("64b7f0c2e4b0a1a2b3c4d5e6").unwrap_err();
        assert!(matches!(err, FollowError::InvalidUserId(raw) if raw == "64b7f0c2e4b0a1a2b3c4d5e6"));
    }
}
