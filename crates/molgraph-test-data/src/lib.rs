use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Two small molecules (water, methane) in multi-molecule xyz format.
    pub fn qm_xyz_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/molecules/qm_two.xyz"),
            suffix: "xyz",
        }
    }

    /// The matching pre-computed structure file for [TestFile::qm_xyz_01].
    pub fn qm_sdf_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/molecules/qm_two.sdf"),
            suffix: "sdf",
        }
    }

    pub fn contents(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
