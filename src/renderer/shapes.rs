//! Draw command generation for 2D primitives

use glam::Vec2;

use crate::consts::DANGER_STRIP_HEIGHT;
use crate::sim::{Particle, Target, Viewport};

/// Target fill alpha, appended to the palette hex (`#rrggbbaa`)
const TARGET_FILL_ALPHA: &str = "40";
const TARGET_STROKE_WIDTH: f64 = 2.0;
const PARTICLE_RADIUS: f64 = 2.0;
const LABEL_COLOR: &str = "#fff";
const LABEL_FONT: &str = "bold 12px Inter, sans-serif";
const DANGER_COLOR: &str = "rgba(239, 68, 68, 0.2)";

/// Font settings for a text command
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: &'static str,
}

/// One canvas drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: Vec2,
        radius: f64,
        fill: String,
        /// (color, line width)
        stroke: Option<(&'static str, f64)>,
        alpha: f64,
    },
    Text {
        pos: Vec2,
        text: &'static str,
        style: TextStyle,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: &'static str,
    },
}

/// Build the frame: targets, then particles, then the danger strip
pub fn scene(targets: &[Target], particles: &[Particle], viewport: Viewport) -> Vec<DrawCmd> {
    let width = viewport.width as f64;
    let height = viewport.height as f64;

    let mut cmds = Vec::with_capacity(2 + targets.len() * 2 + particles.len());
    cmds.push(DrawCmd::Clear { width, height });

    for target in targets {
        cmds.push(DrawCmd::Circle {
            center: target.pos,
            radius: target.radius as f64,
            fill: format!("{}{}", target.color.hex(), TARGET_FILL_ALPHA),
            stroke: Some((target.color.hex(), TARGET_STROKE_WIDTH)),
            alpha: 1.0,
        });
        cmds.push(DrawCmd::Text {
            pos: target.pos,
            text: target.kind.as_str(),
            style: TextStyle {
                font: LABEL_FONT,
                color: LABEL_COLOR,
            },
        });
    }

    for particle in particles {
        cmds.push(DrawCmd::Circle {
            center: particle.pos,
            radius: PARTICLE_RADIUS,
            fill: particle.color.hex().to_string(),
            stroke: None,
            alpha: particle.life.clamp(0.0, 1.0) as f64,
        });
    }

    cmds.push(DrawCmd::Rect {
        x: 0.0,
        y: height - DANGER_STRIP_HEIGHT,
        width,
        height: DANGER_STRIP_HEIGHT,
        fill: DANGER_COLOR,
    });

    cmds
}
