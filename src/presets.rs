//! Built-in profiles.
//!
//! `basic` pushes the focused window to a screen half or fills the screen.
//! `extended` adds column thirds and quadrants. The two are independent
//! profiles and share operation names where the geometry is identical.

use crate::config::{Config, OperationEntry};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    Basic,
    #[default]
    Extended,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Basic, Profile::Extended];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        halves(&mut config);
        if *self == Self::Extended {
            thirds(&mut config);
            quadrants(&mut config);
        }
        config
    }
}

impl FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown profile {:?} (expected basic or extended)", s))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn push(config: &mut Config, name: &str, direction: &str, style: &str) {
    let mut parameters = BTreeMap::new();
    parameters.insert("direction".to_string(), direction.to_string());
    parameters.insert("style".to_string(), style.to_string());
    config.operations.push(OperationEntry {
        name: name.to_string(),
        kind: "push".to_string(),
        parameters,
    });
}

fn move_to(config: &mut Config, name: &str, x: &str, y: &str, width: &str, height: &str) {
    let mut parameters = BTreeMap::new();
    parameters.insert("x".to_string(), x.to_string());
    parameters.insert("y".to_string(), y.to_string());
    parameters.insert("width".to_string(), width.to_string());
    parameters.insert("height".to_string(), height.to_string());
    config.operations.push(OperationEntry {
        name: name.to_string(),
        kind: "move".to_string(),
        parameters,
    });
}

fn halves(config: &mut Config) {
    push(config, "pushRight", "right", "bar-resize:screenSizeX/2");
    push(config, "pushLeft", "left", "bar-resize:screenSizeX/2");
    push(config, "pushTop", "top", "bar-resize:screenSizeY/2");
    push(config, "pushBottom", "bottom", "bar-resize:screenSizeY/2");
    move_to(
        config,
        "fullscreen",
        "screenOriginX",
        "screenOriginY",
        "screenSizeX",
        "screenSizeY",
    );

    // Cmd+Shift+Enter and the arrows
    config.bind("return:cmd,shift", "fullscreen");
    config.bind("left:cmd,shift", "pushLeft");
    config.bind("right:cmd,shift", "pushRight");
    config.bind("up:cmd,shift", "pushTop");
    config.bind("down:cmd,shift", "pushBottom");
}

fn thirds(config: &mut Config) {
    move_to(
        config,
        "pushLeftThird",
        "screenOriginX",
        "screenOriginY",
        "screenSizeX/3",
        "screenSizeY",
    );
    move_to(
        config,
        "pushCenterThird",
        "screenOriginX + screenSizeX/3",
        "screenOriginY",
        "screenSizeX/3",
        "screenSizeY",
    );
    move_to(
        config,
        "pushRightThird",
        "screenOriginX + 2*screenSizeX/3",
        "screenOriginY",
        "screenSizeX/3",
        "screenSizeY",
    );

    config.bind("8:cmd,shift", "pushLeftThird");
    config.bind("9:cmd,shift", "pushCenterThird");
    config.bind("0:cmd,shift", "pushRightThird");
}

fn quadrants(config: &mut Config) {
    move_to(
        config,
        "pushTopLeft",
        "screenOriginX",
        "screenOriginY",
        "screenSizeX/2",
        "screenSizeY/2",
    );
    move_to(
        config,
        "pushTopRight",
        "screenOriginX + screenSizeX/2",
        "screenOriginY",
        "screenSizeX/2",
        "screenSizeY/2",
    );
    move_to(
        config,
        "pushBottomLeft",
        "screenOriginX",
        "screenOriginY + screenSizeY/2",
        "screenSizeX/2",
        "screenSizeY/2",
    );
    move_to(
        config,
        "pushBottomRight",
        "screenOriginX + screenSizeX/2",
        "screenOriginY + screenSizeY/2",
        "screenSizeX/2",
        "screenSizeY/2",
    );

    // Left hand on the home row: G H over F J
    config.bind("g:cmd,shift", "pushTopLeft");
    config.bind("h:cmd,shift", "pushTopRight");
    config.bind("f:cmd,shift", "pushBottomLeft");
    config.bind("j:cmd,shift", "pushBottomRight");
}
