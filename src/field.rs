/// Which of the three simulation fields an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Density,
    VelocityX,
    VelocityY,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Density, FieldKind::VelocityX, FieldKind::VelocityY];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Density => "density",
            FieldKind::VelocityX => "velocity_x",
            FieldKind::VelocityY => "velocity_y",
        }
    }
}

/// A rectangular grid of scalar samples stored row-major in one buffer.
///
/// Reads through [`Field::get`] treat every coordinate outside
/// `[0, width) x [0, height)` as zero, which is the boundary condition all
/// of the solver stencils rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let data = (0..width * height)
            .map(|i| f(i % width, i / width))
            .collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Value at `(x, y)`, or `0.0` outside the grid.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> f64 {
        match self.index(x, y) {
            Some(idx) => self.data[idx],
            None => 0.0,
        }
    }

    /// Writes `value` at `(x, y)`. Returns `false` and leaves the field
    /// untouched when the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, value: f64) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.data[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy of this field at a new size. The overlapping sub-rectangle is
    /// kept, new cells are zero.
    pub fn resized(&self, width: usize, height: usize) -> Self {
        let mut out = Field::new(width, height);
        let copy_w = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src = y * self.width;
            let dst = y * width;
            out.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        out
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn l2_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}
