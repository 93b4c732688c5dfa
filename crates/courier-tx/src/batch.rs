//! Action batch file loading and decoding.

use std::path::{Path, PathBuf};
use std::str::FromStr as _;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::{ParsePubkeyError, Pubkey};
use thiserror::Error;

/// File name the batch is read from when no override is configured.
pub const BATCH_FILE_NAME: &str = "actions.json";

/// One account reference touched by an action.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account address.
    pub pubkey: String,
    /// True when the account must sign the transaction.
    #[serde(default)]
    pub is_signer: bool,
    /// True when the action may mutate the account.
    #[serde(default)]
    pub is_writable: bool,
}

/// One ledger action, passed through without interpreting its payload.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Program invoked by this action.
    pub program_id: String,
    /// Ordered account references the action touches.
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    /// Base64-encoded action payload.
    #[serde(default)]
    pub data: String,
}

/// Batch loading and decoding errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Batch file does not exist at the resolved location.
    #[error("{} file not found", file_name(.path))]
    NotFound {
        /// Resolved batch file path.
        path: PathBuf,
    },
    /// Batch file exists but could not be read.
    #[error("failed to read batch file: {source}")]
    Read {
        /// I/O failure.
        source: std::io::Error,
    },
    /// Batch file is not a well-formed action array. The parser message is
    /// surfaced unmodified.
    #[error("{source}")]
    Malformed {
        /// JSON parse failure.
        source: serde_json::Error,
    },
    /// Program location could not be resolved for the default batch path.
    #[error("failed to resolve program location: {source}")]
    ProgramLocation {
        /// I/O failure from the executable path lookup.
        source: std::io::Error,
    },
    /// Program path has no containing directory.
    #[error("program path has no containing directory")]
    NoProgramDirectory,
    /// Action carries an invalid program id.
    #[error("action {index} has invalid program id `{value}`: {source}")]
    InvalidProgramId {
        /// Zero-based action position.
        index: usize,
        /// Offending value.
        value: String,
        /// Address parse failure.
        source: ParsePubkeyError,
    },
    /// Action carries an invalid account key.
    #[error("action {index} has invalid account key `{value}`: {source}")]
    InvalidAccountKey {
        /// Zero-based action position.
        index: usize,
        /// Offending value.
        value: String,
        /// Address parse failure.
        source: ParsePubkeyError,
    },
    /// Action payload is not valid base64.
    #[error("action {index} has invalid payload encoding: {source}")]
    InvalidPayload {
        /// Zero-based action position.
        index: usize,
        /// Base64 decode failure.
        source: base64::DecodeError,
    },
}

/// Ordered action batch loaded verbatim from a local file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ActionBatch {
    /// Actions in file order.
    actions: Vec<ActionRecord>,
}

impl ActionBatch {
    /// Wraps an in-memory action list. Order is preserved.
    #[must_use]
    pub fn from_actions(actions: Vec<ActionRecord>) -> Self {
        Self { actions }
    }

    /// Loads the batch from a local file.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::NotFound`] when the file does not exist,
    /// [`BatchError::Read`] on I/O failure, and [`BatchError::Malformed`]
    /// when the contents are not a JSON action array.
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        if !path.exists() {
            return Err(BatchError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| BatchError::Read { source })?;
        let actions: Vec<ActionRecord> =
            serde_json::from_str(&raw).map_err(|source| BatchError::Malformed { source })?;
        tracing::debug!(actions = actions.len(), path = %path.display(), "loaded action batch");
        Ok(Self { actions })
    }

    /// Returns the actions in file order.
    #[must_use]
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Returns the number of actions in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true when the batch holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Decodes the batch into ledger instructions, preserving file order.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] naming the first action whose program id,
    /// account key, or payload encoding is invalid.
    pub fn instructions(&self) -> Result<Vec<Instruction>, BatchError> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| decode_action(index, action))
            .collect()
    }
}

/// Decodes one action record into a ledger instruction.
fn decode_action(index: usize, action: &ActionRecord) -> Result<Instruction, BatchError> {
    let program_id = Pubkey::from_str(&action.program_id).map_err(|source| {
        BatchError::InvalidProgramId {
            index,
            value: action.program_id.clone(),
            source,
        }
    })?;
    let mut accounts = Vec::with_capacity(action.accounts.len());
    for account in &action.accounts {
        let pubkey =
            Pubkey::from_str(&account.pubkey).map_err(|source| BatchError::InvalidAccountKey {
                index,
                value: account.pubkey.clone(),
                source,
            })?;
        accounts.push(AccountMeta {
            pubkey,
            is_signer: account.is_signer,
            is_writable: account.is_writable,
        });
    }
    let data = BASE64_STANDARD
        .decode(&action.data)
        .map_err(|source| BatchError::InvalidPayload { index, source })?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Returns the default batch path: `actions.json` next to the program.
///
/// The file is resolved relative to the program's own location rather than
/// the invoking shell's working directory, so the program behaves the same
/// regardless of caller context.
///
/// # Errors
///
/// Returns [`BatchError::ProgramLocation`] or
/// [`BatchError::NoProgramDirectory`] when the executable path cannot be
/// resolved.
pub fn default_path() -> Result<PathBuf, BatchError> {
    let exe = std::env::current_exe().map_err(|source| BatchError::ProgramLocation { source })?;
    let dir = exe.parent().ok_or(BatchError::NoProgramDirectory)?;
    Ok(dir.join(BATCH_FILE_NAME))
}

/// Returns the file name component used in operator-facing messages.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an action with a fresh program id and the given payload.
    fn action(data: &str) -> ActionRecord {
        ActionRecord {
            program_id: Pubkey::new_unique().to_string(),
            accounts: vec![AccountRecord {
                pubkey: Pubkey::new_unique().to_string(),
                is_signer: false,
                is_writable: true,
            }],
            data: data.to_owned(),
        }
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir_result = tempfile::tempdir();
        assert!(dir_result.is_ok());
        if let Ok(dir) = dir_result {
            let path = dir.path().join(BATCH_FILE_NAME);
            let result = ActionBatch::load(&path);
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.to_string(), "actions.json file not found");
            }
        }
    }

    #[test]
    fn malformed_file_propagates_parser_message() {
        let dir_result = tempfile::tempdir();
        assert!(dir_result.is_ok());
        if let Ok(dir) = dir_result {
            let path = dir.path().join(BATCH_FILE_NAME);
            let raw = "{ not an action array";
            assert!(std::fs::write(&path, raw).is_ok());

            let expected = serde_json::from_str::<Vec<ActionRecord>>(raw)
                .err()
                .map(|error| error.to_string());
            assert!(expected.is_some());

            let result = ActionBatch::load(&path);
            assert!(result.is_err());
            if let (Err(error), Some(expected)) = (result, expected) {
                assert_eq!(error.to_string(), expected);
            }
        }
    }

    #[test]
    fn empty_array_loads_as_empty_batch() {
        let dir_result = tempfile::tempdir();
        assert!(dir_result.is_ok());
        if let Ok(dir) = dir_result {
            let path = dir.path().join(BATCH_FILE_NAME);
            assert!(std::fs::write(&path, "[]").is_ok());
            let result = ActionBatch::load(&path);
            assert!(result.is_ok());
            if let Ok(batch) = result {
                assert!(batch.is_empty());
                let instructions = batch.instructions();
                assert!(instructions.is_ok());
                if let Ok(instructions) = instructions {
                    assert!(instructions.is_empty());
                }
            }
        }
    }

    #[test]
    fn file_order_is_preserved() {
        let actions = vec![action("AQ=="), action("Ag=="), action("Aw==")];
        let encoded = serde_json::to_string(&actions);
        assert!(encoded.is_ok());

        let dir_result = tempfile::tempdir();
        assert!(dir_result.is_ok());
        if let (Ok(dir), Ok(encoded)) = (dir_result, encoded) {
            let path = dir.path().join(BATCH_FILE_NAME);
            assert!(std::fs::write(&path, encoded).is_ok());
            let result = ActionBatch::load(&path);
            assert!(result.is_ok());
            if let Ok(batch) = result {
                assert_eq!(batch.actions(), actions.as_slice());
                let instructions = batch.instructions();
                assert!(instructions.is_ok());
                if let Ok(instructions) = instructions {
                    let payloads: Vec<Vec<u8>> = instructions
                        .into_iter()
                        .map(|instruction| instruction.data)
                        .collect();
                    assert_eq!(payloads, vec![vec![1_u8], vec![2_u8], vec![3_u8]]);
                }
            }
        }
    }

    #[test]
    fn invalid_program_id_names_the_action() {
        let batch = ActionBatch::from_actions(vec![ActionRecord {
            program_id: "not-an-address".to_owned(),
            accounts: Vec::new(),
            data: String::new(),
        }]);
        let result = batch.instructions();
        assert!(result.is_err());
        assert!(matches!(
            result,
            Err(BatchError::InvalidProgramId { index: 0, .. })
        ));
    }

    #[test]
    fn invalid_payload_encoding_names_the_action() {
        let batch = ActionBatch::from_actions(vec![ActionRecord {
            program_id: Pubkey::new_unique().to_string(),
            accounts: Vec::new(),
            data: "%%not-base64%%".to_owned(),
        }]);
        let result = batch.instructions();
        assert!(result.is_err());
        assert!(matches!(
            result,
            Err(BatchError::InvalidPayload { index: 0, .. })
        ));
    }

    #[test]
    fn empty_payload_decodes_to_no_bytes() {
        let batch = ActionBatch::from_actions(vec![ActionRecord {
            program_id: Pubkey::new_unique().to_string(),
            accounts: Vec::new(),
            data: String::new(),
        }]);
        let result = batch.instructions();
        assert!(result.is_ok());
        if let Ok(instructions) = result {
            assert_eq!(instructions.len(), 1);
            let first = instructions.first();
            assert!(first.is_some());
            if let Some(first) = first {
                assert!(first.data.is_empty());
            }
        }
    }

    #[test]
    fn default_path_sits_next_to_the_program() {
        let result = default_path();
        assert!(result.is_ok());
        if let Ok(path) = result {
            assert_eq!(
                path.file_name().and_then(|name| name.to_str()),
                Some(BATCH_FILE_NAME)
            );
            let exe = std::env::current_exe();
            assert!(exe.is_ok());
            if let Ok(exe) = exe {
                assert_eq!(path.parent(), exe.parent());
            }
        }
    }
}
