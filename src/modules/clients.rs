//! Client (customer) operations
//!
//! Thin wrappers over the dispatcher for the dashboard's client endpoints.
//! The dashboard has no lookup-by-id endpoint, so [`Clients::get`] filters
//! the full listing.

use crate::session::DashboardClient;
use crate::types::RequestSpec;
use crate::utils::format_field;
use crate::Result;
use serde_json::{Map, Value, json};

/// Client record to create, merged over the dashboard's defaults
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    /// First name
    pub nombre: String,
    /// Last name
    pub apellido: String,
    /// Email address, also used to find the record back after creation
    pub email: String,
    /// Phone number
    pub telefono: String,
    /// Street address
    pub direccion: String,
    /// Two-letter country code; defaults to `GT`
    pub pais: Option<String>,
    /// State; only meaningful for US and CA
    pub state: Option<String>,
    /// Postal code; dropped for Guatemala
    pub postalcode: Option<String>,
    /// City; defaults to `Guatemala`
    pub ciudad: Option<String>,
    /// Tax number; defaults to the consumer-final marker `C/F`
    pub nit: Option<String>,
}

/// Accessor for client operations
#[derive(Debug)]
pub struct Clients<'a> {
    client: &'a DashboardClient,
}

impl<'a> Clients<'a> {
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// All clients of the company
    pub async fn all(&self) -> Result<Option<Value>> {
        let company = self.client.company().await?;
        self.client
            .fetch_data(RequestSpec::get(format!("api/mi/clientes/{}", company.id)))
            .await
    }

    /// One client by id, `None` when absent
    pub async fn get(&self, client_id: i64) -> Result<Option<Value>> {
        let Some(clients) = self.all().await? else {
            return Ok(None);
        };
        let Some(list) = clients.as_array() else {
            return Ok(None);
        };

        Ok(list
            .iter()
            .find(|c| c.get("id").and_then(Value::as_i64) == Some(client_id))
            .cloned())
    }

    /// Search clients by name or email
    pub async fn search(&self, term: &str) -> Result<Option<Value>> {
        self.client
            .fetch_data(
                RequestSpec::post("api/miV2/searchClient")
                    .with_param("busqueda", term.trim())
                    .json(),
            )
            .await
    }

    /// Create a client record.
    ///
    /// The dashboard needs a create-then-edit sequence: the create call
    /// registers the record against the company, the search finds its id,
    /// and the edit call fills in the remaining fields. Returns whether the
    /// record was found back after creation.
    pub async fn create(&self, new_client: NewClient) -> Result<bool> {
        let company = self.client.company().await?;

        let pais = new_client.pais.unwrap_or_else(|| "GT".to_string());
        let mut state = new_client.state.unwrap_or_else(|| "GT".to_string());
        let mut postalcode = new_client.postalcode.unwrap_or_else(|| "01001".to_string());
        let ciudad = new_client.ciudad.unwrap_or_else(|| "Guatemala".to_string());
        let nit = new_client.nit.unwrap_or_else(|| "C/F".to_string());

        // States only exist for the US and Canada
        if pais != "US" && pais != "CA" {
            state.clear();
        } else if state.chars().count() > 2 {
            state = state.chars().take(2).collect::<String>().to_uppercase();
        }

        // Guatemala has no postal codes the dashboard accepts
        if pais == "GT" {
            postalcode.clear();
        }

        let email = new_client.email.clone();

        let mut params = Map::new();
        params.insert(
            "identidad_empresa".to_string(),
            company.identidad_empresa.clone().unwrap_or(Value::Null),
        );
        params.insert("id_empresa".to_string(), Value::from(company.id));
        params.insert(
            "nombre".to_string(),
            Value::from(format_field(&new_client.nombre)),
        );
        params.insert(
            "apellido".to_string(),
            Value::from(format_field(&new_client.apellido)),
        );
        params.insert("email".to_string(), Value::from(email.clone()));
        params.insert("telefono".to_string(), Value::from(new_client.telefono));
        params.insert(
            "direccion".to_string(),
            Value::from(format_field(&new_client.direccion)),
        );
        params.insert("pais".to_string(), Value::from(pais));
        params.insert("state".to_string(), Value::from(state));
        params.insert("postalcode".to_string(), Value::from(postalcode));
        params.insert("ciudad".to_string(), Value::from(format_field(&ciudad)));
        params.insert("nit".to_string(), Value::from(nit));
        params.insert(
            "adicional".to_string(),
            json!({ "titulos": [], "descripcion": [] }),
        );

        self.client
            .send_request(
                &RequestSpec::post(format!("api/mi/clientes/crear/{}", company.id))
                    .with_params(params.clone())
                    .json(),
            )
            .await?;

        // The edit payload is the same record minus the company linkage
        params.remove("identidad_empresa");
        params.remove("id_empresa");

        let found = self.search(&email).await?;
        let Some(first) = found.as_ref().and_then(Value::as_array).and_then(|l| l.first())
        else {
            tracing::warn!("created client not found back by email search");
            return Ok(false);
        };

        if let Some(id) = first.get("id") {
            let id = match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            self.client
                .send_request(
                    &RequestSpec::put(format!("api/mi/clientes/editar/{}", id))
                        .with_params(params)
                        .json(),
                )
                .await?;
        }

        Ok(true)
    }
}
