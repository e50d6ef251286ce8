use bytemuck::{Pod, Zeroable};

/// Linear RGB radiance triple. Componentwise arithmetic is defined directly
/// because transport math multiplies throughputs with BRDF values.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self(arr)
    }

    pub const fn to_array(self) -> [f32; 3] {
        self.0
    }

    pub const fn splat(v: f32) -> Self {
        Self([v, v, v])
    }

    pub fn max_element(self) -> f32 {
        self.0[0].max(self.0[1]).max(self.0[2])
    }

    pub fn is_black(self) -> bool {
        self == linear::BLACK
    }

    /// Rec. 709 luminance of a linear RGB value.
    pub fn luminance(self) -> f32 {
        0.2126 * self.0[0] + 0.7152 * self.0[1] + 0.0722 * self.0[2]
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba([self.0[0], self.0[1], self.0[2], alpha])
    }

    pub fn to_srgb(self) -> [f32; 3] {
        self.0.map(srgb_encode)
    }

    pub fn to_srgb8(self) -> [u8; 3] {
        self.to_srgb().map(|c| (c.clamp(0.0, 1.0) * 255. + 0.5) as u8)
    }
}

pub fn srgb_encode(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(val: [f32; 3]) -> Self {
        Rgb(val)
    }
}

impl std::ops::Add for Rgb {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl std::ops::AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul for Rgb {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self([
            self.0[0] * rhs.0[0],
            self.0[1] * rhs.0[1],
            self.0[2] * rhs.0[2],
        ])
    }
}

impl std::ops::MulAssign for Rgb {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<Rgb> for f32 {
    type Output = Rgb;

    fn mul(self, rhs: Rgb) -> Rgb {
        Rgb([self * rhs.0[0], self * rhs.0[1], self * rhs.0[2]])
    }
}

impl std::ops::Mul<f32> for Rgb {
    type Output = Rgb;

    fn mul(self, rhs: f32) -> Rgb {
        rhs * self
    }
}

impl std::ops::Div<f32> for Rgb {
    type Output = Rgb;

    fn div(self, rhs: f32) -> Rgb {
        Rgb([self.0[0] / rhs, self.0[1] / rhs, self.0[2] / rhs])
    }
}

impl std::ops::DivAssign<f32> for Rgb {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

/// Linear RGB with an alpha channel, the compositor pixel format.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub fn rgb(self) -> Rgb {
        Rgb([self.0[0], self.0[1], self.0[2]])
    }
}

pub mod linear {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::from_array([1.0, 1.0, 1.0]);
    pub const BLACK: Rgb = Rgb::from_array([0.0, 0.0, 0.0]);
    pub const RED: Rgb = Rgb::from_array([1.0, 0.0, 0.0]);
    pub const GREEN: Rgb = Rgb::from_array([0.0, 1.0, 0.0]);
    pub const BLUE: Rgb = Rgb::from_array([0.0, 0.0, 1.0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn componentwise_ops() {
        let a = Rgb([1.0, 2.0, 3.0]);
        let b = Rgb([0.5, 0.5, 2.0]);
        assert_eq!(a * b, Rgb([0.5, 1.0, 6.0]));
        assert_eq!(a + b, Rgb([1.5, 2.5, 5.0]));
        assert_eq!(2.0 * a, Rgb([2.0, 4.0, 6.0]));
        assert_eq!(a / 2.0, Rgb([0.5, 1.0, 1.5]));
    }

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb_encode(0.0), 0.0);
        assert!((srgb_encode(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(linear::BLACK.to_srgb8(), [0, 0, 0]);
        assert_eq!(linear::WHITE.to_srgb8(), [255, 255, 255]);
    }
}
