// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::models::TransactionKind;

/// Failures raised by the record source, the ledger and the config layer.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Failed to fetch {side} records: {source}")]
    SourceFetch {
        side: TransactionKind,
        #[source]
        source: Box<SiteError>,
    },
    #[error("Malformed amount '{value}' in {table} row {id}")]
    MalformedAmount {
        table: &'static str,
        id: i64,
        value: String,
    },
    #[error("Invalid timestamp '{value}' in {table} row {id}")]
    InvalidTimestamp {
        table: &'static str,
        id: i64,
        value: String,
    },
    #[error("Amount overflow while summing {0}")]
    AmountOverflow(String),
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl SiteError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        SiteError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn fetch(side: TransactionKind, err: SiteError) -> Self {
        SiteError::SourceFetch {
            side,
            source: Box::new(err),
        }
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
