//! Grid stencils for the stable-fluids step: implicit diffusion, density
//! advection and pressure projection.
//!
//! Every stencil reads neighbours through [`Field::get`], so cells beyond the
//! grid edge contribute zero. Sweeps update their working field in place in
//! row-major order; a fixed iteration count bounds the cost of each call.

use crate::field::Field;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Clamps negatives to zero while letting NaN through unchanged.
#[inline]
pub fn non_negative(value: f64) -> f64 {
    if value < 0.0 { 0.0 } else { value }
}

#[inline]
fn neighbour_sum(field: &Field, x: isize, y: isize) -> f64 {
    field.get(x - 1, y) + field.get(x + 1, y) + field.get(x, y - 1) + field.get(x, y + 1)
}

/// Solves `(I - k L) out = x` with `iterations` relaxation sweeps starting
/// from a zero field.
///
/// With `viscosity == 0` the result equals the input exactly. Zero
/// iterations returns the input unchanged rather than an empty field.
pub fn diffuse(x: &Field, viscosity: f64, iterations: usize) -> Field {
    if iterations == 0 {
        return x.clone();
    }

    let (width, height) = (x.width(), x.height());
    let mut xn = Field::new(width, height);

    for _ in 0..iterations {
        for r in 0..height as isize {
            for c in 0..width as isize {
                let sn = neighbour_sum(&xn, c, r) / 4.0;
                xn.set(c, r, (x.get(c, r) + viscosity * sn) / (1.0 + viscosity));
            }
        }
    }

    xn
}

/// Semi-Lagrangian transport of `density` along the velocity field.
///
/// Each cell traces back by its own velocity, samples the old density
/// bilinearly at that point and clamps the result at zero.
pub fn advect(density: &Field, velocity_x: &Field, velocity_y: &Field) -> Field {
    let (width, height) = (density.width(), density.height());
    let mut out = Field::new(width, height);

    for y in 0..height as isize {
        for x in 0..width as isize {
            let fx = x as f64 - velocity_x.get(x, y);
            let fy = y as f64 - velocity_y.get(x, y);

            let (bx, by) = (fx.floor(), fy.floor());
            let (jx, jy) = (fx - bx, fy - by);
            let (ix, iy) = (bx as isize, by as isize);

            let z1 = lerp(density.get(ix, iy), density.get(ix + 1, iy), jx);
            let z2 = lerp(density.get(ix, iy + 1), density.get(ix + 1, iy + 1), jx);
            out.set(x, y, non_negative(lerp(z1, z2, jy)));
        }
    }

    out
}

/// Central-difference divergence of the velocity field.
pub fn divergence(velocity_x: &Field, velocity_y: &Field) -> Field {
    let (width, height) = (velocity_x.width(), velocity_x.height());
    let mut dv = Field::new(width, height);

    for y in 0..height as isize {
        for x in 0..width as isize {
            let value = (velocity_x.get(x + 1, y) - velocity_x.get(x - 1, y)
                + velocity_y.get(x, y + 1)
                - velocity_y.get(x, y - 1))
                / 2.0;
            dv.set(x, y, value);
        }
    }

    dv
}

/// Pressure for the given divergence, relaxed `iterations` times from zero.
pub fn solve_pressure(divergence: &Field, iterations: usize) -> Field {
    let (width, height) = (divergence.width(), divergence.height());
    let mut p = Field::new(width, height);

    for _ in 0..iterations {
        for y in 0..height as isize {
            for x in 0..width as isize {
                p.set(x, y, (neighbour_sum(&p, x, y) - divergence.get(x, y)) / 4.0);
            }
        }
    }

    p
}

/// Removes (most of) the divergence from the velocity field in place by
/// subtracting the gradient of the solved pressure.
///
/// The residual after the call depends on `iterations`; it shrinks but
/// generally does not reach zero.
pub fn project(velocity_x: &mut Field, velocity_y: &mut Field, iterations: usize) {
    let dv = divergence(velocity_x, velocity_y);
    let p = solve_pressure(&dv, iterations);

    for y in 0..p.height() as isize {
        for x in 0..p.width() as isize {
            let gx = (p.get(x + 1, y) - p.get(x - 1, y)) / 2.0;
            let gy = (p.get(x, y + 1) - p.get(x, y - 1)) / 2.0;
            velocity_x.set(x, y, velocity_x.get(x, y) - gx);
            velocity_y.set(x, y, velocity_y.get(x, y) - gy);
        }
    }
}
