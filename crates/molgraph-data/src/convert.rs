//! External structure inference: xyz text in, mol-block text out.
//!
//! Bonding is not stored in xyz files, so approximate chemical bonds are
//! produced by an external tool treated as a black box. The tool being
//! absent is an expected condition; callers degrade to node-only data.

use crate::error::{DataError, DataResult};
use std::io::Write;
use std::process::{Command, Stdio};

/// Seam for the xyz -> mol-block conversion step, so datasets can be
/// tested without the external binary.
pub trait StructureInference: std::fmt::Debug {
    /// Convert one molecule's xyz text into a mol-block string.
    fn infer(&self, xyz: &str) -> DataResult<String>;
}

/// Runs the `obabel` command-line converter.
#[derive(Debug, Clone)]
pub struct OpenBabel {
    program: String,
}

impl Default for OpenBabel {
    fn default() -> Self {
        OpenBabel {
            program: "obabel".to_string(),
        }
    }
}

impl OpenBabel {
    pub fn with_program(program: impl Into<String>) -> Self {
        OpenBabel {
            program: program.into(),
        }
    }
}

impl StructureInference for OpenBabel {
    fn infer(&self, xyz: &str) -> DataResult<String> {
        let mut child = Command::new(&self.program)
            .args(["-ixyz", "-omol"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DataError::Inference(format!("could not run {}: {e}", self.program)))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(xyz.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(DataError::Inference(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        let mol = String::from_utf8(output.stdout)
            .map_err(|e| DataError::Inference(e.to_string()))?;
        if mol.trim().is_empty() {
            return Err(DataError::Inference(format!(
                "{} produced no output",
                self.program
            )));
        }
        Ok(mol)
    }
}
