//! Wire types for the Shopify Admin API.

use serde::{Deserialize, Serialize};

/// A customer metafield record as returned by the REST API.
///
/// The record ID only exists after first creation; callers that hold a
/// `Metafield` know the record exists and can update it in place.
#[derive(Debug, Clone, Deserialize)]
pub struct Metafield {
    /// Record identifier, assigned by Shopify on creation.
    pub id: i64,
    /// Metafield namespace.
    pub namespace: String,
    /// Metafield key.
    pub key: String,
    /// Encoded value.
    pub value: String,
    /// Declared value type tag (e.g. "json").
    #[serde(rename = "type")]
    pub value_type: String,
}

/// Response envelope for the metafield lookup endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldsEnvelope {
    pub metafields: Vec<Metafield>,
}

/// Response envelope for metafield create/update.
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldEnvelope {
    pub metafield: Metafield,
}

/// Request wrapper; the REST API nests every payload under `metafield`.
#[derive(Debug, Serialize)]
pub(crate) struct MetafieldPayload<T> {
    pub metafield: T,
}

/// Payload for creating a metafield on a customer.
#[derive(Debug, Serialize)]
pub(crate) struct CreateMetafield<'a> {
    pub namespace: &'a str,
    pub key: &'a str,
    #[serde(rename = "type")]
    pub value_type: &'a str,
    pub value: &'a str,
    pub owner_id: &'a str,
    pub owner_resource: &'a str,
}

/// Payload for updating a metafield by record ID.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateMetafield<'a> {
    pub id: i64,
    #[serde(rename = "type")]
    pub value_type: &'a str,
    pub value: &'a str,
}

/// Customer fields returned by the `customerUpdate` mutation.
///
/// Deserialized from GraphQL's camelCase; serialized to clients in the
/// API's snake_case convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Customer {
    /// Customer GID (e.g. `gid://shopify/Customer/123`).
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A field-level validation error reported by Shopify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the rejected field (e.g. `input.email`).
    pub field: String,
    /// Shopify's message, verbatim.
    pub message: String,
}

/// Raw `userErrors` entry from GraphQL; `field` is a path array or null.
#[derive(Debug, Deserialize)]
pub(crate) struct RawUserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl From<RawUserError> for FieldError {
    fn from(raw: RawUserError) -> Self {
        Self {
            field: raw.field.map(|path| path.join(".")).unwrap_or_default(),
            message: raw.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metafields_envelope_deserializes() {
        let body = r#"{
            "metafields": [
                {
                    "id": 912837,
                    "namespace": "custom",
                    "key": "read_messages",
                    "value": "[\"call_1\"]",
                    "type": "json",
                    "owner_id": 8412398572,
                    "owner_resource": "customer"
                }
            ]
        }"#;

        let envelope: MetafieldsEnvelope = serde_json::from_str(body).expect("deserializes");
        assert_eq!(envelope.metafields.len(), 1);
        let field = &envelope.metafields[0];
        assert_eq!(field.id, 912_837);
        assert_eq!(field.namespace, "custom");
        assert_eq!(field.key, "read_messages");
        assert_eq!(field.value, r#"["call_1"]"#);
        assert_eq!(field.value_type, "json");
    }

    #[test]
    fn test_metafields_envelope_empty() {
        let envelope: MetafieldsEnvelope =
            serde_json::from_str(r#"{"metafields": []}"#).expect("deserializes");
        assert!(envelope.metafields.is_empty());
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = MetafieldPayload {
            metafield: CreateMetafield {
                namespace: "custom",
                key: "pinned_calls",
                value_type: "json",
                value: "[]",
                owner_id: "8412398572",
                owner_resource: "customer",
            },
        };

        let json = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(json["metafield"]["namespace"], "custom");
        assert_eq!(json["metafield"]["type"], "json");
        assert_eq!(json["metafield"]["owner_resource"], "customer");
    }

    #[test]
    fn test_customer_deserializes_camel_case() {
        let body = r#"{
            "id": "gid://shopify/Customer/123",
            "firstName": "Ada",
            "lastName": null,
            "email": "ada@example.com"
        }"#;

        let customer: Customer = serde_json::from_str(body).expect("deserializes");
        assert_eq!(customer.first_name.as_deref(), Some("Ada"));
        assert_eq!(customer.last_name, None);

        // Serialized back out in snake_case for our own API.
        let out = serde_json::to_value(&customer).expect("serializes");
        assert_eq!(out["first_name"], "Ada");
    }

    #[test]
    fn test_field_error_from_raw() {
        let raw = RawUserError {
            field: Some(vec!["input".to_string(), "email".to_string()]),
            message: "Email is invalid".to_string(),
        };
        let err = FieldError::from(raw);
        assert_eq!(err.field, "input.email");
        assert_eq!(err.message, "Email is invalid");
    }

    #[test]
    fn test_field_error_from_raw_null_field() {
        let raw = RawUserError {
            field: None,
            message: "Something else".to_string(),
        };
        let err = FieldError::from(raw);
        assert_eq!(err.field, "");
    }
}
