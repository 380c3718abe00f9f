//! Model-backed task augmentation.
//!
//! - [`client`] - the boundary to the text-generation API (`CompletionModel`)
//! - [`prompts`] - deterministic prompt templates built from partial tasks
//! - [`augment`] - the four augmentation flows (`TaskAugmenter`)
//!
//! Error messages in this module reach HTTP clients verbatim, so they use the
//! same language as the rest of the public API.

pub mod augment;
pub mod client;
pub mod prompts;

pub use augment::{RiskAudit, TaskAugmenter};
pub use client::{AzureOpenAiClient, CompletionModel};

use thiserror::Error;

/// Errors from a single call to the model API.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Network or transport failure before a response arrived
    #[error("Error al llamar a Azure OpenAI: {0}")]
    Transport(String),

    /// The API answered with a non-success status
    #[error("Error al llamar a Azure OpenAI: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read or had no content
    #[error("Error al llamar a Azure OpenAI: respuesta inválida: {0}")]
    Response(String),
}

/// Errors from an augmentation flow.
#[derive(Debug, Error)]
pub enum AugmentError {
    /// Inputs the flow needs were absent from the request
    #[error("Campos faltantes: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model answered with something that names no known category
    #[error("Categoría inválida recibida del LLM: {0}")]
    InvalidCategory(String),

    /// No number could be found in the model's effort estimate
    #[error("No se pudo extraer un número válido de la respuesta: {0}")]
    UnparseableEffort(String),

    #[error("El esfuerzo no puede ser negativo: {0}")]
    NegativeEffort(f64),
}

impl AugmentError {
    /// Whether the model answered but its output had the wrong shape.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            AugmentError::InvalidCategory(_)
                | AugmentError::UnparseableEffort(_)
                | AugmentError::NegativeEffort(_)
        )
    }
}
