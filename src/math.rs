use crate::scene::Material;
use std::f64::consts::PI;

/// Light reaching surfaces that face away from every light source
pub const AMBIENT: f64 = 0.12;

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Builds the rotation matrix for Euler angles applied in XYZ order
pub fn rotation_matrix(euler: &[f64; 3]) -> [[f64; 3]; 3] {
    let (sin_x, cos_x) = euler[0].sin_cos();
    let (sin_y, cos_y) = euler[1].sin_cos();
    let (sin_z, cos_z) = euler[2].sin_cos();

    let rotation_x = [[1.0, 0.0, 0.0], [0.0, cos_x, -sin_x], [0.0, sin_x, cos_x]];
    let rotation_y = [[cos_y, 0.0, sin_y], [0.0, 1.0, 0.0], [-sin_y, 0.0, cos_y]];
    let rotation_z = [[cos_z, -sin_z, 0.0], [sin_z, cos_z, 0.0], [0.0, 0.0, 1.0]];

    multiply_matrices(&multiply_matrices(&rotation_x, &rotation_y), &rotation_z)
}

pub fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: &[f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Returns the unit vector pointing along `a`, or zero for a degenerate input
pub fn normalize(a: &[f64; 3]) -> [f64; 3] {
    let length = dot(a, a).sqrt();
    if length <= f64::EPSILON {
        return [0.0; 3];
    }
    scale(a, 1.0 / length)
}

/// Calculates the normal vector of a counter-clockwise triangle
pub fn calculate_normal(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> [f64; 3] {
    let u = sub(b, a);
    let v = sub(c, a);
    normalize(&cross(&u, &v))
}

/// Lit colour of a flat-shaded surface point, channels in [0, 1] before clamping.
///
/// Lambert diffuse plus a normalized Blinn-Phong lobe whose width follows the
/// material roughness. Metalness moves energy from the diffuse term into a
/// specular term tinted by the base colour. Surfaces are lit from both sides.
pub fn shade(
    material: &Material,
    normal: &[f64; 3],
    light_dir: &[f64; 3],
    view_dir: &[f64; 3],
    radiance: &[f64; 3],
) -> [f64; 3] {
    let base = material.linear_color();
    let normal = if dot(normal, view_dir) < 0.0 {
        scale(normal, -1.0)
    } else {
        *normal
    };

    let n_dot_l = dot(&normal, light_dir).max(0.0);
    let half = normalize(&add(light_dir, view_dir));
    let n_dot_h = dot(&normal, &half).max(0.0);

    let alpha = material.roughness.max(0.02).powi(2);
    let shininess = (2.0 / (alpha * alpha) - 2.0).max(1.0);
    let specular = n_dot_h.powf(shininess) * (shininess + 8.0) / (8.0 * PI);

    let diffuse_weight = 1.0 - 0.65 * material.metalness;
    let mut out = [0.0; 3];
    for i in 0..3 {
        let specular_color = 0.04 + (base[i] - 0.04) * material.metalness;
        let direct = base[i] * diffuse_weight + specular_color * specular;
        out[i] = base[i] * AMBIENT + radiance[i] * n_dot_l * direct;
    }
    out
}

/// Relative luminance of a linear colour
pub fn luminance(color: &[f64; 3]) -> f64 {
    0.2126 * color[0] + 0.7152 * color[1] + 0.0722 * color[2]
}

/// Applies lighting to a color
pub fn apply_lighting(light: &[f64; 3]) -> [u8; 3] {
    let r = (light[0] * 255.0).clamp(0.0, 255.0) as u8;
    let g = (light[1] * 255.0).clamp(0.0, 255.0) as u8;
    let b = (light[2] * 255.0).clamp(0.0, 255.0) as u8;
    [r, g, b]
}

/// Parses `#rrggbb` or `#rgb` into 8-bit channels
pub fn parse_hex_color(s: &str) -> Result<[u8; 3], String> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(format!("invalid hex digits in {s:?}"));
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(format!("expected #rrggbb or #rgb, got {s:?}")),
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| format!("invalid hex digits in {s:?}"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_hex_color(color: &[u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Converts 8-bit RGB into hue, saturation and lightness, each in [0, 1]
pub fn rgb_to_hsl(color: &[u8; 3]) -> [f64; 3] {
    let [r, g, b] = color.map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    if max == min {
        return [0.0, 0.0, lightness];
    }

    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    [hue / 6.0, saturation, lightness]
}

/// Converts hue, saturation and lightness back into 8-bit RGB
pub fn hsl_to_rgb(hsl: &[f64; 3]) -> [u8; 3] {
    let [h, s, l] = *hsl;
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }

    fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
    .map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}
