//! Customer profile updates via the Admin GraphQL API.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use callshelf_core::CustomerId;

use super::types::{Customer, FieldError, RawUserError};
use super::{AdminClient, ShopifyError};

/// The `customerUpdate` mutation.
///
/// Absent input fields are omitted entirely rather than sent as null;
/// GraphQL treats an explicit null as "clear this field".
const CUSTOMER_UPDATE_MUTATION: &str = "\
mutation customerUpdate($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
      firstName
      lastName
      email
    }
    userErrors {
      field
      message
    }
  }
}";

/// Errors from a customer profile update.
///
/// Field-level rejections from Shopify are kept structurally distinct from
/// transport failures so the HTTP layer can surface them verbatim to the
/// caller.
#[derive(Debug, Error)]
pub enum CustomerUpdateError {
    /// Shopify rejected one or more fields.
    #[error("customer fields rejected: {}", format_field_errors(.0))]
    Fields(Vec<FieldError>),

    /// The API call itself failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Partial update of a customer's profile; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct CustomerUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerInput<'a> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerUpdateData {
    customer_update: Option<CustomerUpdatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerUpdatePayload {
    customer: Option<Customer>,
    #[serde(default)]
    user_errors: Vec<RawUserError>,
}

impl AdminClient {
    /// Update a customer's name and/or email.
    ///
    /// # Errors
    ///
    /// Returns `CustomerUpdateError::Fields` with Shopify's field-level
    /// errors verbatim, or `CustomerUpdateError::Shopify` for transport and
    /// API failures.
    #[instrument(skip(self, update), fields(customer = %customer))]
    pub async fn update_customer(
        &self,
        customer: &CustomerId,
        update: CustomerUpdate<'_>,
    ) -> Result<Customer, CustomerUpdateError> {
        let variables = serde_json::json!({
            "input": CustomerInput {
                id: format!("gid://shopify/Customer/{}", customer.as_str()),
                first_name: update.first_name,
                last_name: update.last_name,
                email: update.email,
            }
        });

        let data: CustomerUpdateData = self
            .execute_graphql(CUSTOMER_UPDATE_MUTATION, variables)
            .await?;

        let payload = data.customer_update.ok_or_else(|| {
            ShopifyError::Parse("no customerUpdate payload in response".to_string())
        })?;

        if !payload.user_errors.is_empty() {
            return Err(CustomerUpdateError::Fields(
                payload.user_errors.into_iter().map(FieldError::from).collect(),
            ));
        }

        payload.customer.map_or_else(
            || {
                Err(CustomerUpdateError::Shopify(ShopifyError::Parse(
                    "no customer in customerUpdate payload".to_string(),
                )))
            },
            Ok,
        )
    }

    /// Execute a GraphQL query against the Admin API.
    async fn execute_graphql<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http()
            .post(self.graphql_url())
            .json(&body)
            .send()
            .await?;

        let envelope: GraphQLResponse<T> = self.parse_response(response).await?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ShopifyError::GraphQL(joined));
        }

        envelope
            .data
            .ok_or_else(|| ShopifyError::Parse("no data in GraphQL response".to_string()))
    }
}
