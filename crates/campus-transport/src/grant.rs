use serde::Deserialize;

use campus_core::models::TokenGrant;

/// Token responses arrive either wrapped in the success envelope or flat.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum GrantBody {
    Wrapped { data: TokenGrant },
    Flat(TokenGrant),
}

impl GrantBody {
    pub(crate) fn into_grant(self) -> TokenGrant {
        match self {
            Self::Wrapped { data } => data,
            Self::Flat(grant) => grant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wrapped_and_flat_shapes() {
        let wrapped: GrantBody = serde_json::from_str(
            r#"{"status":200,"data":{"accessToken":"a","refreshToken":"r"}}"#,
        )
        .unwrap();
        let flat: GrantBody = serde_json::from_str(r#"{"accessToken":"a"}"#).unwrap();

        assert_eq!(wrapped.into_grant().refresh_token.as_deref(), Some("r"));
        assert_eq!(flat.into_grant().access_token, "a");
    }
}
