//! Shape generation for 2D primitives

use glam::{IVec2, UVec2, Vec2};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::direction;
use crate::sim::Spark;

/// Diamond for a spark: long tip ahead, short sides, long tail behind.
/// Length scales with speed so sparks shrink as they slow.
pub fn spark_polygon(spark: &Spark, scroll: IVec2) -> [Vec2; 4] {
    let pos = spark.pos - scroll.as_vec2();
    let long = spark.speed * 3.0;
    let short = spark.speed * 0.5;
    [
        pos + direction(spark.angle) * long,
        pos + direction(spark.angle + FRAC_PI_2) * short,
        pos + direction(spark.angle + PI) * long,
        pos + direction(spark.angle - FRAC_PI_2) * short,
    ]
}

/// Top-left that centers an image of `size` on `pos`
pub fn centered(pos: Vec2, size: UVec2) -> Vec2 {
    pos - size.as_vec2() / 2.0
}
