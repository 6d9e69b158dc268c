// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Forward-Mode Differentiation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dual numbers carrying the gradient with respect to two independent
//! variables (x, z). Evaluating an expression on [`Dual2`] inputs yields its
//! value together with exact partial derivatives.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual2 {
    pub value: f64,
    /// (∂/∂x, ∂/∂z)
    pub grad: [f64; 2],
}

impl Dual2 {
    pub const fn constant(value: f64) -> Self {
        Dual2 {
            value,
            grad: [0.0, 0.0],
        }
    }

    /// Independent variable `x` (seeded gradient (1, 0)).
    pub const fn var_x(value: f64) -> Self {
        Dual2 {
            value,
            grad: [1.0, 0.0],
        }
    }

    /// Independent variable `z` (seeded gradient (0, 1)).
    pub const fn var_z(value: f64) -> Self {
        Dual2 {
            value,
            grad: [0.0, 1.0],
        }
    }

    pub fn dx(&self) -> f64 {
        self.grad[0]
    }

    pub fn dz(&self) -> f64 {
        self.grad[1]
    }

    fn chain(self, value: f64, slope: f64) -> Self {
        Dual2 {
            value,
            grad: [slope * self.grad[0], slope * self.grad[1]],
        }
    }

    pub fn ln(self) -> Self {
        self.chain(self.value.ln(), 1.0 / self.value)
    }

    pub fn sqrt(self) -> Self {
        let s = self.value.sqrt();
        self.chain(s, 0.5 / s)
    }

    pub fn sin(self) -> Self {
        self.chain(self.value.sin(), self.value.cos())
    }

    pub fn cos(self) -> Self {
        self.chain(self.value.cos(), -self.value.sin())
    }

    pub fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Dual2::constant(1.0);
        }
        self.chain(self.value.powi(n), f64::from(n) * self.value.powi(n - 1))
    }
}

impl From<f64> for Dual2 {
    fn from(value: f64) -> Self {
        Dual2::constant(value)
    }
}

impl Add for Dual2 {
    type Output = Dual2;
    fn add(self, rhs: Dual2) -> Dual2 {
        Dual2 {
            value: self.value + rhs.value,
            grad: [self.grad[0] + rhs.grad[0], self.grad[1] + rhs.grad[1]],
        }
    }
}

impl Sub for Dual2 {
    type Output = Dual2;
    fn sub(self, rhs: Dual2) -> Dual2 {
        Dual2 {
            value: self.value - rhs.value,
            grad: [self.grad[0] - rhs.grad[0], self.grad[1] - rhs.grad[1]],
        }
    }
}

impl Mul for Dual2 {
    type Output = Dual2;
    fn mul(self, rhs: Dual2) -> Dual2 {
        Dual2 {
            value: self.value * rhs.value,
            grad: [
                self.grad[0] * rhs.value + self.value * rhs.grad[0],
                self.grad[1] * rhs.value + self.value * rhs.grad[1],
            ],
        }
    }
}

impl Div for Dual2 {
    type Output = Dual2;
    fn div(self, rhs: Dual2) -> Dual2 {
        let inv = 1.0 / rhs.value;
        let q = self.value * inv;
        Dual2 {
            value: q,
            grad: [
                (self.grad[0] - q * rhs.grad[0]) * inv,
                (self.grad[1] - q * rhs.grad[1]) * inv,
            ],
        }
    }
}

impl Neg for Dual2 {
    type Output = Dual2;
    fn neg(self) -> Dual2 {
        Dual2 {
            value: -self.value,
            grad: [-self.grad[0], -self.grad[1]],
        }
    }
}

impl Add<f64> for Dual2 {
    type Output = Dual2;
    fn add(self, rhs: f64) -> Dual2 {
        Dual2 {
            value: self.value + rhs,
            grad: self.grad,
        }
    }
}

impl Sub<f64> for Dual2 {
    type Output = Dual2;
    fn sub(self, rhs: f64) -> Dual2 {
        Dual2 {
            value: self.value - rhs,
            grad: self.grad,
        }
    }
}

impl Mul<f64> for Dual2 {
    type Output = Dual2;
    fn mul(self, rhs: f64) -> Dual2 {
        Dual2 {
            value: self.value * rhs,
            grad: [self.grad[0] * rhs, self.grad[1] * rhs],
        }
    }
}

impl Mul<Dual2> for f64 {
    type Output = Dual2;
    fn mul(self, rhs: Dual2) -> Dual2 {
        rhs * self
    }
}

impl AddAssign for Dual2 {
    fn add_assign(&mut self, rhs: Dual2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dual2 {
    fn sub_assign(&mut self, rhs: Dual2) {
        *self = *self - rhs;
    }
}
