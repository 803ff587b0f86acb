pub mod adapt;
pub mod curve;
mod directive;
pub mod emit;
pub mod scanner;
pub mod surface;

use std::fs;
use std::path::{Path, PathBuf};

use nurbs_config::CodecConfig;
use nurbs_core::nurbs::{Curve, RationalCurve, RationalSurface, Surface};
use thiserror::Error;
use tracing::debug;

pub use adapt::ControlPoint;
pub use curve::{CurveRecord, decode_curve, encode_curve};
pub use directive::RawVertex;
pub use emit::WriterOptions;
pub use surface::{SurfaceRecord, decode_surface, encode_surface};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{directive}' line missing/incomplete in file")]
    MissingDirective { directive: &'static str },
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// 编解码过程中产生的错误，由 [`ObjFacade`] 转换为 [`IoError`]。
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("'{directive}' line missing/incomplete in file")]
    MissingDirective { directive: &'static str },
    #[error("{message}")]
    Mismatch { message: String },
    #[error("{message}")]
    Invalid { message: String },
}

impl ObjError {
    pub(crate) fn mismatch(message: impl Into<String>) -> Self {
        Self::Mismatch {
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl From<ObjError> for IoError {
    fn from(err: ObjError) -> Self {
        match err {
            ObjError::MissingDirective { directive } => IoError::MissingDirective { directive },
            ObjError::Mismatch { message } => IoError::StructuralMismatch(message),
            ObjError::Invalid { message } => IoError::InvalidValue(message),
        }
    }
}

pub trait GeometryLoader<G> {
    fn load(&self, path: &Path) -> Result<G, IoError>;
}

pub trait GeometrySaver<G> {
    fn save(&self, geometry: &G, path: &Path) -> Result<(), IoError>;
}

/// OBJ 自由曲线/曲面格式的读写入口。
#[derive(Debug, Clone, Default)]
pub struct ObjFacade {
    options: WriterOptions,
}

impl ObjFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_options(WriterOptions::from_config(&config.writer))
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// 读取曲线记录，保留文件中的 `cstype` 有理标志。
    pub fn read_curve_record(&self, path: &Path) -> Result<CurveRecord, IoError> {
        let data = read_source(path)?;
        let record = decode_curve(&data)?;
        debug!(path = %path.display(), rational = record.rational, "读取曲线成功");
        Ok(record)
    }

    pub fn read_surface_record(&self, path: &Path) -> Result<SurfaceRecord, IoError> {
        let data = read_source(path)?;
        let record = decode_surface(&data)?;
        debug!(path = %path.display(), rational = record.rational, "读取曲面成功");
        Ok(record)
    }

    /// 写出曲线记录，目标文件会被截断覆盖。
    pub fn write_curve_record(&self, record: &CurveRecord, path: &Path) -> Result<(), IoError> {
        let text = encode_curve(record, &self.options)?;
        write_target(path, &text)
    }

    pub fn write_surface_record(&self, record: &SurfaceRecord, path: &Path) -> Result<(), IoError> {
        let text = encode_surface(record, &self.options)?;
        write_target(path, &text)
    }
}

fn read_source(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|source| IoError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

fn write_target(path: &Path, text: &str) -> Result<(), IoError> {
    fs::write(path, text).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "写出 OBJ 成功");
    Ok(())
}

impl<P: ControlPoint> GeometryLoader<Curve<P>> for ObjFacade {
    fn load(&self, path: &Path) -> Result<Curve<P>, IoError> {
        self.read_curve_record(path).map(adapt::into_curve)
    }
}

impl<P: ControlPoint> GeometryLoader<RationalCurve<P>> for ObjFacade {
    fn load(&self, path: &Path) -> Result<RationalCurve<P>, IoError> {
        self.read_curve_record(path).map(adapt::into_rational_curve)
    }
}

impl<P: ControlPoint> GeometryLoader<Surface<P>> for ObjFacade {
    fn load(&self, path: &Path) -> Result<Surface<P>, IoError> {
        self.read_surface_record(path).map(adapt::into_surface)
    }
}

impl<P: ControlPoint> GeometryLoader<RationalSurface<P>> for ObjFacade {
    fn load(&self, path: &Path) -> Result<RationalSurface<P>, IoError> {
        self.read_surface_record(path)
            .map(adapt::into_rational_surface)
    }
}

impl<P: ControlPoint> GeometrySaver<Curve<P>> for ObjFacade {
    fn save(&self, geometry: &Curve<P>, path: &Path) -> Result<(), IoError> {
        self.write_curve_record(&adapt::curve_record(geometry), path)
    }
}

impl<P: ControlPoint> GeometrySaver<RationalCurve<P>> for ObjFacade {
    fn save(&self, geometry: &RationalCurve<P>, path: &Path) -> Result<(), IoError> {
        self.write_curve_record(&adapt::rational_curve_record(geometry), path)
    }
}

impl<P: ControlPoint> GeometrySaver<Surface<P>> for ObjFacade {
    fn save(&self, geometry: &Surface<P>, path: &Path) -> Result<(), IoError> {
        self.write_surface_record(&adapt::surface_record(geometry), path)
    }
}

impl<P: ControlPoint> GeometrySaver<RationalSurface<P>> for ObjFacade {
    fn save(&self, geometry: &RationalSurface<P>, path: &Path) -> Result<(), IoError> {
        self.write_surface_record(&adapt::rational_surface_record(geometry), path)
    }
}

pub fn read_curve<P: ControlPoint>(path: impl AsRef<Path>) -> Result<Curve<P>, IoError> {
    ObjFacade::new().load(path.as_ref())
}

pub fn read_rational_curve<P: ControlPoint>(
    path: impl AsRef<Path>,
) -> Result<RationalCurve<P>, IoError> {
    ObjFacade::new().load(path.as_ref())
}

pub fn read_surface<P: ControlPoint>(path: impl AsRef<Path>) -> Result<Surface<P>, IoError> {
    ObjFacade::new().load(path.as_ref())
}

pub fn read_rational_surface<P: ControlPoint>(
    path: impl AsRef<Path>,
) -> Result<RationalSurface<P>, IoError> {
    ObjFacade::new().load(path.as_ref())
}

pub fn save_curve<P: ControlPoint>(path: impl AsRef<Path>, curve: &Curve<P>) -> Result<(), IoError> {
    ObjFacade::new().save(curve, path.as_ref())
}

pub fn save_rational_curve<P: ControlPoint>(
    path: impl AsRef<Path>,
    curve: &RationalCurve<P>,
) -> Result<(), IoError> {
    ObjFacade::new().save(curve, path.as_ref())
}

pub fn save_surface<P: ControlPoint>(
    path: impl AsRef<Path>,
    surface: &Surface<P>,
) -> Result<(), IoError> {
    ObjFacade::new().save(surface, path.as_ref())
}

pub fn save_rational_surface<P: ControlPoint>(
    path: impl AsRef<Path>,
    surface: &RationalSurface<P>,
) -> Result<(), IoError> {
    ObjFacade::new().save(surface, path.as_ref())
}
