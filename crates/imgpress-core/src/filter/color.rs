//! Per-pixel color operations of the filter chain.
//!
//! Formulas follow the CSS Filter Effects shorthand definitions. Channels are
//! processed as unpremultiplied floats in 0.0..=1.0, clamped after every
//! operation, and alpha is never touched.

use super::FilterOp;

type Matrix = [[f32; 3]; 3];

/// Apply a run of color operations to RGBA pixel data in place.
///
/// `ops` must not contain [`FilterOp::Blur`]; the chain splits runs around it.
pub(crate) fn apply_color_ops(pixels: &mut [u8], ops: &[FilterOp]) {
    if ops.is_empty() {
        return;
    }

    let steps: Vec<ColorStep> = ops.iter().filter_map(|op| ColorStep::from_op(*op)).collect();

    for chunk in pixels.chunks_exact_mut(4) {
        let mut rgb = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
        ];

        for step in &steps {
            rgb = step.apply(rgb);
        }

        chunk[0] = to_u8(rgb[0]);
        chunk[1] = to_u8(rgb[1]);
        chunk[2] = to_u8(rgb[2]);
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A color operation resolved to its numeric form.
#[derive(Debug, Clone, Copy)]
enum ColorStep {
    /// `c * slope + intercept` on every channel.
    Linear { slope: f32, intercept: f32 },
    Matrix(Matrix),
}

impl ColorStep {
    fn from_op(op: FilterOp) -> Option<Self> {
        match op {
            FilterOp::Brightness(pct) => Some(ColorStep::Linear {
                slope: pct / 100.0,
                intercept: 0.0,
            }),
            FilterOp::Contrast(pct) => {
                let amount = pct / 100.0;
                Some(ColorStep::Linear {
                    slope: amount,
                    intercept: 0.5 - 0.5 * amount,
                })
            }
            FilterOp::Saturate(pct) => Some(ColorStep::Matrix(saturate_matrix(pct / 100.0))),
            FilterOp::Sepia(pct) => Some(ColorStep::Matrix(sepia_matrix(pct / 100.0))),
            FilterOp::Grayscale(pct) => Some(ColorStep::Matrix(grayscale_matrix(pct / 100.0))),
            FilterOp::HueRotate(deg) => Some(ColorStep::Matrix(hue_rotate_matrix(deg))),
            FilterOp::Invert(pct) => {
                // c * (1 - a) + (1 - c) * a
                let amount = (pct / 100.0).min(1.0);
                Some(ColorStep::Linear {
                    slope: 1.0 - 2.0 * amount,
                    intercept: amount,
                })
            }
            FilterOp::Blur(_) => None,
        }
    }

    #[inline]
    fn apply(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match self {
            ColorStep::Linear { slope, intercept } => [
                r * slope + intercept,
                g * slope + intercept,
                b * slope + intercept,
            ],
            ColorStep::Matrix(m) => [
                m[0][0] * r + m[0][1] * g + m[0][2] * b,
                m[1][0] * r + m[1][1] * g + m[1][2] * b,
                m[2][0] * r + m[2][1] * g + m[2][2] * b,
            ],
        };
        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
        ]
    }
}

fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix {
    let a = 1.0 - amount.min(1.0);
    [
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix {
    let a = 1.0 - amount.min(1.0);
    [
        [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> Matrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}
