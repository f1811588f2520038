use crate::error::{ConfigError, EvalError};
use crate::expr::{Formula, Metric};
use crate::{Rect, ScreenMetrics};
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" | "up" => Ok(Self::Top),
            "bottom" | "down" => Ok(Self::Bottom),
            _ => Err(ConfigError::UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a pushed window is sized once it is flush against the screen edge.
#[derive(Debug, Clone, PartialEq)]
pub enum PushStyle {
    /// Keep size and the position on the other axis.
    None,
    /// Keep size, centre on the other axis.
    Center,
    /// Stretch across the whole other axis, keep size along the push axis.
    Bar,
    /// Like `Bar`, with the size along the push axis given by a formula.
    BarResize(Formula),
}

impl FromStr for PushStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(formula) = s.strip_prefix("bar-resize:") {
            return Ok(Self::BarResize(Formula::parse(formula)?));
        }
        match s {
            "" | "none" => Ok(Self::None),
            "center" => Ok(Self::Center),
            "bar" => Ok(Self::Bar),
            _ => Err(ConfigError::UnknownStyle(s.to_string())),
        }
    }
}

impl fmt::Display for PushStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Center => f.write_str("center"),
            Self::Bar => f.write_str("bar"),
            Self::BarResize(formula) => write!(f, "bar-resize:{}", formula),
        }
    }
}

/// A window geometry transform. Pure data: it is evaluated against the
/// screen metrics current at the time it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Move {
        x: Formula,
        y: Formula,
        width: Formula,
        height: Formula,
    },
    Push {
        direction: Direction,
        style: PushStyle,
    },
}

impl Operation {
    /// Builds an operation from its kind and textual parameters, the same
    /// shape the configuration file uses.
    pub fn declare(
        name: &str,
        kind: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let param = |key: &'static str| {
            parameters
                .get(key)
                .ok_or_else(|| ConfigError::MissingParameter {
                    operation: name.to_string(),
                    parameter: key,
                })
        };

        let operation = match kind.trim().to_lowercase().as_str() {
            "move" => Self::Move {
                x: param("x")?.parse()?,
                y: param("y")?.parse()?,
                width: param("width")?.parse()?,
                height: param("height")?.parse()?,
            },
            "push" => Self::Push {
                direction: param("direction")?.parse()?,
                style: match parameters.get("style") {
                    Some(style) => style.parse()?,
                    None => PushStyle::None,
                },
            },
            _ => {
                return Err(ConfigError::UnknownKind {
                    operation: name.to_string(),
                    kind: kind.to_string(),
                })
            }
        };

        for key in parameters.keys() {
            if !operation.parameter_names().contains(&key.as_str()) {
                warn!("Operation {:?} ignores unknown parameter {:?}", name, key);
            }
        }

        Ok(operation)
    }

    /// A move covering the whole screen.
    pub fn fullscreen() -> Self {
        Self::Move {
            x: Formula::metric(Metric::OriginX),
            y: Formula::metric(Metric::OriginY),
            width: Formula::metric(Metric::SizeX),
            height: Formula::metric(Metric::SizeY),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Push { .. } => "push",
        }
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Self::Move { .. } => &["x", "y", "width", "height"],
            Self::Push { .. } => &["direction", "style"],
        }
    }

    /// The textual parameters this operation would be declared with.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        match self {
            Self::Move {
                x,
                y,
                width,
                height,
            } => {
                params.insert("x".to_string(), x.to_string());
                params.insert("y".to_string(), y.to_string());
                params.insert("width".to_string(), width.to_string());
                params.insert("height".to_string(), height.to_string());
            }
            Self::Push { direction, style } => {
                params.insert("direction".to_string(), direction.to_string());
                params.insert("style".to_string(), style.to_string());
            }
        }
        params
    }

    /// Computes the frame `window` should take on `screen`.
    pub fn evaluate(&self, window: Rect, screen: &ScreenMetrics) -> Result<Rect, EvalError> {
        match self {
            Self::Move {
                x,
                y,
                width,
                height,
            } => Ok(Rect::new(
                x.eval(screen)?,
                y.eval(screen)?,
                width.eval(screen)?,
                height.eval(screen)?,
            )),
            Self::Push { direction, style } => push(*direction, style, window, screen),
        }
    }
}

fn push(
    direction: Direction,
    style: &PushStyle,
    window: Rect,
    screen: &ScreenMetrics,
) -> Result<Rect, EvalError> {
    let bounds = screen.as_rect();
    let mut frame = window;

    // Size along the push axis, then placement on the other axis.
    if direction.is_horizontal() {
        if let PushStyle::BarResize(formula) = style {
            frame.width = formula.eval(screen)?;
        }
        match style {
            PushStyle::None => {}
            PushStyle::Center => frame.y = bounds.y + (bounds.height - frame.height) / 2.0,
            PushStyle::Bar | PushStyle::BarResize(_) => {
                frame.y = bounds.y;
                frame.height = bounds.height;
            }
        }
    } else {
        if let PushStyle::BarResize(formula) = style {
            frame.height = formula.eval(screen)?;
        }
        match style {
            PushStyle::None => {}
            PushStyle::Center => frame.x = bounds.x + (bounds.width - frame.width) / 2.0,
            PushStyle::Bar | PushStyle::BarResize(_) => {
                frame.x = bounds.x;
                frame.width = bounds.width;
            }
        }
    }

    match direction {
        Direction::Left => frame.x = bounds.x,
        Direction::Right => frame.x = bounds.x + bounds.width - frame.width,
        Direction::Top => frame.y = bounds.y,
        Direction::Bottom => frame.y = bounds.y + bounds.height - frame.height,
    }

    Ok(frame)
}

/// Named operations, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct OperationTable {
    operations: HashMap<String, Operation>,
}

impl OperationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name`; a later declaration of the same name replaces the
    /// earlier one.
    pub fn insert(&mut self, name: impl Into<String>, operation: Operation) {
        let name = name.into();
        if self.operations.insert(name.clone(), operation).is_some() {
            warn!("Operation {:?} declared more than once, keeping the last", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operation)> {
        let mut entries: Vec<_> = self
            .operations
            .iter()
            .map(|(name, op)| (name.as_str(), op))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn screen() -> ScreenMetrics {
        ScreenMetrics::new(0.0, 0.0, 1920.0, 1080.0)
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn half(direction: &str, axis: &str) -> Operation {
        let style = format!("bar-resize:{}/2", axis);
        Operation::declare(
            "half",
            "push",
            &params(&[("direction", direction), ("style", &style)]),
        )
        .unwrap()
    }

    #[test]
    fn fullscreen_covers_the_screen() {
        let frame = Operation::fullscreen()
            .evaluate(Rect::new(100.0, 100.0, 300.0, 200.0), &screen())
            .unwrap();
        assert_eq!(frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }

    #[test]
    fn push_halves() {
        let window = Rect::new(300.0, 200.0, 800.0, 600.0);
        let left = half("left", "screenSizeX").evaluate(window, &screen()).unwrap();
        let right = half("right", "screenSizeX").evaluate(window, &screen()).unwrap();
        let top = half("top", "screenSizeY").evaluate(window, &screen()).unwrap();
        let bottom = half("bottom", "screenSizeY").evaluate(window, &screen()).unwrap();

        assert_eq!(left, Rect::new(0.0, 0.0, 960.0, 1080.0));
        assert_eq!(right, Rect::new(960.0, 0.0, 960.0, 1080.0));
        assert_eq!(top, Rect::new(0.0, 0.0, 1920.0, 540.0));
        assert_eq!(bottom, Rect::new(0.0, 540.0, 1920.0, 540.0));
    }

    #[test]
    fn push_styles_without_resize() {
        let window = Rect::new(300.0, 200.0, 800.0, 600.0);
        let op = |direction, style| Operation::Push { direction, style };

        assert_eq!(
            op(Direction::Right, PushStyle::None).evaluate(window, &screen()).unwrap(),
            Rect::new(1120.0, 200.0, 800.0, 600.0)
        );
        assert_eq!(
            op(Direction::Top, PushStyle::Center).evaluate(window, &screen()).unwrap(),
            Rect::new(560.0, 0.0, 800.0, 600.0)
        );
        assert_eq!(
            op(Direction::Left, PushStyle::Bar).evaluate(window, &screen()).unwrap(),
            Rect::new(0.0, 0.0, 800.0, 1080.0)
        );
    }

    #[test]
    fn push_respects_screen_origin() {
        let secondary = ScreenMetrics::new(1920.0, 25.0, 1440.0, 875.0);
        let frame = half("bottom", "screenSizeY")
            .evaluate(Rect::new(0.0, 0.0, 10.0, 10.0), &secondary)
            .unwrap();
        assert_eq!(frame, Rect::new(1920.0, 462.5, 1440.0, 437.5));
    }

    #[test]
    fn reapplying_is_stable() {
        let ops = [
            half("left", "screenSizeX"),
            half("bottom", "screenSizeY"),
            Operation::Push {
                direction: Direction::Top,
                style: PushStyle::Center,
            },
            Operation::fullscreen(),
        ];
        for op in ops {
            let once = op.evaluate(Rect::new(37.0, 91.0, 640.0, 480.0), &screen()).unwrap();
            let twice = op.evaluate(once, &screen()).unwrap();
            assert_eq!(once, twice, "{:?} drifted", op);
        }
    }

    #[test]
    fn declare_reports_problems() {
        assert_matches!(
            Operation::declare("x", "resize", &params(&[])),
            Err(ConfigError::UnknownKind { .. })
        );
        assert_matches!(
            Operation::declare("x", "move", &params(&[("x", "0"), ("y", "0"), ("width", "1")])),
            Err(ConfigError::MissingParameter { parameter: "height", .. })
        );
        assert_matches!(
            Operation::declare("x", "push", &params(&[("direction", "sideways")])),
            Err(ConfigError::UnknownDirection(_))
        );
        assert_matches!(
            Operation::declare("x", "push", &params(&[("direction", "left"), ("style", "wobble")])),
            Err(ConfigError::UnknownStyle(_))
        );
        assert_matches!(
            Operation::declare(
                "x",
                "push",
                &params(&[("direction", "left"), ("style", "bar-resize:windowSizeX")])
            ),
            Err(ConfigError::Formula { .. })
        );
    }

    #[test]
    fn parameters_round_trip() {
        let op = half("right", "screenSizeX");
        let again = Operation::declare("again", op.kind(), &op.parameters()).unwrap();
        assert_eq!(op, again);
        assert_eq!(op.parameters()["style"], "bar-resize:screenSizeX/2");
    }

    #[test]
    fn later_declaration_wins() {
        let mut table = OperationTable::new();
        table.insert("snap", half("left", "screenSizeX"));
        table.insert("snap", Operation::fullscreen());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("snap"), Some(&Operation::fullscreen()));
    }
}
