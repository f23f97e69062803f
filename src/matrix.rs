use crate::error::QrError;

/// An immutable grid of QR modules, `true` meaning a dark module.
///
/// Produced once by the symbol encoder (quiet zone included) and read-only
/// afterward; the rasterizer samples it but never resizes or mutates it.
/// QR symbols are square, so `width == height` for every matrix coming out
/// of the encoder boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    height: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Builds a matrix from row-major module data.
    ///
    /// Fails with [`QrError::InvalidArgument`] if `modules.len()` does not
    /// equal `width * height`.
    pub fn new(width: usize, height: usize, modules: Vec<bool>) -> Result<Self, QrError> {
        if modules.len() != width * height {
            return Err(QrError::InvalidArgument(format!(
                "module data length {} does not match {}x{} grid",
                modules.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, modules })
    }

    /// Width of the grid in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in modules.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the grid holds no modules at all.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the module at `(x, y)`, or `false` (light) for coordinates
    /// outside the grid.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.modules[y * self.width + x]
    }
}
