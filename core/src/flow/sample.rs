use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample format carried by a link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    ComplexFloat,
    Float,
    Short,
    Char,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::ComplexFloat => "complex_float",
            Format::Float => "float",
            Format::Short => "short",
            Format::Char => "char",
        };
        f.write_str(name)
    }
}

/// A block of samples travelling between two stages.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBlock {
    ComplexFloat(Vec<Complex32>),
    Float(Vec<f32>),
    Short(Vec<i16>),
    Char(Vec<u8>),
}

impl SampleBlock {
    /// Zero-filled block of the given format.
    pub fn silence(format: Format, len: usize) -> Self {
        match format {
            Format::ComplexFloat => SampleBlock::ComplexFloat(vec![Complex32::new(0.0, 0.0); len]),
            Format::Float => SampleBlock::Float(vec![0.0; len]),
            Format::Short => SampleBlock::Short(vec![0; len]),
            Format::Char => SampleBlock::Char(vec![0; len]),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            SampleBlock::ComplexFloat(_) => Format::ComplexFloat,
            SampleBlock::Float(_) => Format::Float,
            SampleBlock::Short(_) => Format::Short,
            SampleBlock::Char(_) => Format::Char,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleBlock::ComplexFloat(samples) => samples.len(),
            SampleBlock::Float(samples) => samples.len(),
            SampleBlock::Short(samples) => samples.len(),
            SampleBlock::Char(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
