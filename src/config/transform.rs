use crate::error::Result as AlgebraResult;
use crate::image::{ColorMode, Image};
use crate::matrix::Matrix;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct TransformDemoConfig {
    pub input: PathBuf,
    #[serde(default = "default_mode")]
    pub mode: ColorMode,
    /// Queued in order; the first step is applied first.
    pub steps: Vec<TransformStep>,
    pub output: TransformOutputConfig,
}

fn default_mode() -> ColorMode {
    ColorMode::Rgb
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformStep {
    Translate { tx: f64, ty: f64 },
    Rotate { degrees: f64 },
    Scale { sx: f64, sy: f64 },
    /// Explicit 3×3 homogeneous matrix, row-major.
    Matrix { rows: Vec<Vec<f64>> },
}

impl TransformStep {
    /// Queue this step on `image`.
    pub fn queue(&self, image: &mut Image) -> AlgebraResult<()> {
        match self {
            TransformStep::Translate { tx, ty } => image.translate(*tx, *ty),
            TransformStep::Rotate { degrees } => image.rotate(*degrees),
            TransformStep::Scale { sx, sy } => image.scale(*sx, *sy),
            TransformStep::Matrix { rows } => image.add_transform(Matrix::from_rows(rows)?)?,
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TransformOutputConfig {
    pub image: PathBuf,
}

pub fn load_config(path: &Path) -> Result<TransformDemoConfig, String> {
    super::read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, ChannelKind};

    #[test]
    fn steps_queue_in_order() {
        let json = r#"{
            "input": "in.png",
            "steps": [
                {"kind": "translate", "tx": 3, "ty": -1},
                {"kind": "rotate", "degrees": 90},
                {"kind": "matrix", "rows": [[1, 0, 0], [0, 1, 0], [0, 0, 1]]}
            ],
            "output": {"image": "out.png"}
        }"#;
        let config: TransformDemoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, ColorMode::Rgb);

        let mut image = Image::from_channel(Channel::new(2, 2, ChannelKind::Gray));
        for step in &config.steps {
            step.queue(&mut image).unwrap();
        }
        assert_eq!(image.pending_transforms().len(), 3);
        assert_eq!(image.pending_transforms()[0].get(0, 2), Ok(3.0));
    }

    #[test]
    fn misshaped_matrix_step_fails() {
        let step = TransformStep::Matrix {
            rows: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        };
        let mut image = Image::from_channel(Channel::new(2, 2, ChannelKind::Gray));
        assert!(step.queue(&mut image).is_err());
        assert!(image.pending_transforms().is_empty());
    }
}
