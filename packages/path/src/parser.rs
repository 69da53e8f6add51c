//! Command interpreter: path data → canonical nodes
//!
//! Tracks the current point and the subpath start across segments and
//! normalizes every command into `Move`, `Line`, `Cubic` or `Close`:
//!
//! - `H`/`V` become lines
//! - `S` reflects the previous cubic's second control about the current point
//! - `T` reflects the previous elevated cubic's first control
//! - `Q`/`T` are elevated to cubics
//! - `A` becomes a single cubic with both controls at the chord midpoint
//!
//! Nothing here returns an error. Segments whose argument list is too short
//! produce no node.

use crate::id_generator::IDGenerator;
use crate::node::{GeometricNode, NodeKind, Point};
use crate::tokenizer::{segments, Segment};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Interpreter switches for the legacy approximations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    /// Consume every complete coordinate group after a command letter instead
    /// of only the first one. Extra pairs after a move are lines.
    #[serde(default)]
    pub implicit_repeat: bool,

    /// Elevate quadratics with distinct controls
    /// (`P0 + 2/3 (Q - P0)` and `P1 + 2/3 (Q - P1)`) instead of one shared
    /// control `2/3 Q + 1/3 P1`.
    #[serde(default)]
    pub exact_quadratic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Move,
    Line,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Arc,
    Close,
}

impl CommandKind {
    fn from_letter(letter: char) -> Option<(Self, bool)> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::Move,
            'L' => CommandKind::Line,
            'H' => CommandKind::Horizontal,
            'V' => CommandKind::Vertical,
            'C' => CommandKind::Cubic,
            'S' => CommandKind::SmoothCubic,
            'Q' => CommandKind::Quadratic,
            'T' => CommandKind::SmoothQuadratic,
            'A' => CommandKind::Arc,
            'Z' => CommandKind::Close,
            _ => return None,
        };
        Some((kind, letter.is_ascii_lowercase()))
    }

    /// Numbers consumed by one coordinate group
    fn arity(self) -> usize {
        match self {
            CommandKind::Close => 0,
            CommandKind::Horizontal | CommandKind::Vertical => 1,
            CommandKind::Move | CommandKind::Line | CommandKind::SmoothQuadratic => 2,
            CommandKind::SmoothCubic | CommandKind::Quadratic => 4,
            CommandKind::Cubic => 6,
            CommandKind::Arc => 7,
        }
    }

    fn family(self) -> Previous {
        match self {
            CommandKind::Cubic | CommandKind::SmoothCubic => Previous::Cubic,
            CommandKind::Quadratic | CommandKind::SmoothQuadratic => Previous::Quadratic,
            _ => Previous::Other,
        }
    }
}

/// Curve family of the previous command letter. Smooth commands reflect the
/// last emitted cubic only when it matches their own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Cubic,
    Quadratic,
    Other,
}

/// Stateful interpreter for one path
pub struct Parser {
    options: ParseOptions,
    id_generator: IDGenerator,
    nodes: Vec<GeometricNode>,
    current: Point,
    subpath_start: Point,
    previous: Previous,
    has_subpath: bool,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            id_generator: IDGenerator::default(),
            nodes: Vec::new(),
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            previous: Previous::Other,
            has_subpath: false,
        }
    }

    pub fn with_id_generator(mut self, id_generator: IDGenerator) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// Interpret `source` and return the nodes it produced.
    pub fn parse(mut self, source: &str) -> Vec<GeometricNode> {
        for segment in segments(source) {
            self.interpret(&segment);
        }
        self.nodes
    }

    fn interpret(&mut self, segment: &Segment) {
        let Some((kind, relative)) = CommandKind::from_letter(segment.command) else {
            self.previous = Previous::Other;
            return;
        };

        if kind == CommandKind::Close {
            self.close();
            self.previous = Previous::Other;
            return;
        }

        let mut groups = segment.args.chunks_exact(kind.arity()).peekable();
        if groups.peek().is_none() {
            trace!(
                command = %segment.command,
                args = segment.args.len(),
                "Dropping segment with truncated arguments"
            );
            // The letter still counts as the previous command
            self.previous = kind.family();
            return;
        }

        let limit = if self.options.implicit_repeat { usize::MAX } else { 1 };
        for (i, group) in groups.take(limit).enumerate() {
            let kind = if i > 0 && kind == CommandKind::Move {
                CommandKind::Line
            } else {
                kind
            };
            self.apply(kind, relative, group);
            self.previous = kind.family();
        }
    }

    fn apply(&mut self, kind: CommandKind, relative: bool, args: &[f64]) {
        if kind != CommandKind::Move && !self.has_subpath {
            trace!(?kind, "Dropping drawing command before first move");
            return;
        }

        match kind {
            CommandKind::Move => {
                let to = self.resolve(relative, args[0], args[1]);
                self.current = to;
                self.subpath_start = to;
                self.has_subpath = true;
                self.emit(|id| GeometricNode::move_to(id, to.x, to.y));
            }

            CommandKind::Line => {
                let to = self.resolve(relative, args[0], args[1]);
                self.line_to(to);
            }

            CommandKind::Horizontal => {
                let x = if relative { self.current.x + args[0] } else { args[0] };
                self.line_to(Point::new(x, self.current.y));
            }

            CommandKind::Vertical => {
                let y = if relative { self.current.y + args[0] } else { args[0] };
                self.line_to(Point::new(self.current.x, y));
            }

            CommandKind::Cubic => {
                let c1 = self.resolve(relative, args[0], args[1]);
                let c2 = self.resolve(relative, args[2], args[3]);
                let end = self.resolve(relative, args[4], args[5]);
                self.cubic_to(c1, c2, end);
            }

            CommandKind::SmoothCubic => {
                let c1 = match self.last_controls(Previous::Cubic) {
                    Some((_, control)) => self.current.reflect(control),
                    None => self.current,
                };
                let c2 = self.resolve(relative, args[0], args[1]);
                let end = self.resolve(relative, args[2], args[3]);
                self.cubic_to(c1, c2, end);
            }

            CommandKind::Quadratic => {
                let control = self.resolve(relative, args[0], args[1]);
                let end = self.resolve(relative, args[2], args[3]);
                self.quadratic_to(control, end);
            }

            CommandKind::SmoothQuadratic => {
                let control = match self.last_controls(Previous::Quadratic) {
                    Some((control, _)) => self.current.reflect(control),
                    None => self.current,
                };
                let end = self.resolve(relative, args[0], args[1]);
                self.quadratic_to(control, end);
            }

            CommandKind::Arc => {
                // Radii, rotation and flags (args[0..5]) do not affect the approximation
                let end = self.resolve(relative, args[5], args[6]);
                let mid = self.current.midpoint(end);
                self.cubic_to(mid, mid, end);
            }

            CommandKind::Close => self.close(),
        }
    }

    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn emit(&mut self, build: impl FnOnce(String) -> GeometricNode) {
        let id = self.id_generator.new_id();
        self.nodes.push(build(id));
    }

    /// Controls of the last node when it is a cubic and the previous command
    /// belongs to `family`
    fn last_controls(&self, family: Previous) -> Option<(Point, Point)> {
        if self.previous != family {
            return None;
        }
        self.nodes
            .last()
            .filter(|node| node.kind == NodeKind::Cubic)
            .map(|node| (node.control1(), node.control2()))
    }

    fn line_to(&mut self, to: Point) {
        self.emit(|id| GeometricNode::line_to(id, to.x, to.y));
        self.current = to;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.emit(|id| GeometricNode::cubic_to(id, c1, c2, end));
        self.current = end;
    }

    fn quadratic_to(&mut self, control: Point, end: Point) {
        let start = self.current;
        let (c1, c2) = if self.options.exact_quadratic {
            (start.lerp(control, 2.0 / 3.0), end.lerp(control, 2.0 / 3.0))
        } else {
            let shared = Point::new(
                (2.0 / 3.0) * control.x + (1.0 / 3.0) * end.x,
                (2.0 / 3.0) * control.y + (1.0 / 3.0) * end.y,
            );
            (shared, shared)
        };
        self.cubic_to(c1, c2, end);
    }

    fn close(&mut self) {
        if !self.has_subpath {
            trace!("Dropping close before first move");
            return;
        }
        let start = self.subpath_start;
        self.emit(|id| GeometricNode::close(id, start.x, start.y));
        self.current = start;
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Parse path data with the legacy options.
pub fn parse(source: &str) -> Vec<GeometricNode> {
    Parser::default().parse(source)
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> Vec<GeometricNode> {
    Parser::new(options).parse(source)
}
