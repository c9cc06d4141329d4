//! Theme derivation: expands a few base colours into a full named set by
//! sampling a fixed list of ramps.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ramp::{RampRequest, RampService};
use crate::tone::ToneSchedule;
use crate::{Algorithm, Color, Result};

/// Base colour names the pipeline knows about.
pub const BASE_NAMES: [&str; 11] = [
    "background",
    "foreground",
    "cursor",
    "selection",
    "accent",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
];

const ANSI_NAMES: [&str; 6] = ["red", "green", "yellow", "blue", "magenta", "cyan"];

/// One end of a recipe ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// A base colour supplied by the caller.
    Base(&'static str),
    Fixed(Color),
}

/// A ramp query plus the positions sampled from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub from: Endpoint,
    pub to: Endpoint,
    pub algorithm: Algorithm,
    pub schedule: Option<ToneSchedule>,
    pub steps: i64,
    pub outputs: Vec<(String, f64)>,
}

impl Recipe {
    fn new(name: &str, from: Endpoint, to: Endpoint, algorithm: Algorithm, steps: i64) -> Self {
        Recipe {
            name: name.to_string(),
            from,
            to,
            algorithm,
            schedule: None,
            steps,
            outputs: Vec::new(),
        }
    }

    fn schedule(mut self, schedule: ToneSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    fn output(mut self, name: &str, t: f64) -> Self {
        self.outputs.push((name.to_string(), t));
        self
    }

    fn bases(&self) -> impl Iterator<Item = &'static str> {
        [self.from, self.to].into_iter().filter_map(|endpoint| match endpoint {
            Endpoint::Base(name) => Some(name),
            Endpoint::Fixed(_) => None,
        })
    }
}

/// The fixed derivation table.
pub static RECIPES: Lazy<Vec<Recipe>> = Lazy::new(|| {
    use Algorithm::*;
    use Endpoint::{Base, Fixed};

    let mut recipes = vec![
        Recipe::new("shadow", Base("background"), Fixed(Color::BLACK), KubelkaMunk, 9)
            .output("shadow-1", 0.25)
            .output("shadow-2", 0.5)
            .output("shadow-3", 0.75),
        Recipe::new("highlight", Base("background"), Fixed(Color::WHITE), KubelkaMunk, 9)
            .output("highlight-1", 0.25)
            .output("highlight-2", 0.5)
            .output("highlight-3", 0.75),
        Recipe::new("surface", Base("background"), Base("foreground"), Oklab, 21)
            .output("surface", 0.05)
            .output("border", 0.15)
            .output("muted-foreground", 0.6),
        Recipe::new("accent-neutral", Base("accent"), Base("foreground"), Cam16Ucs, 9)
            .output("accent-neutral", 0.5),
        Recipe::new("accent-wash", Base("accent"), Base("background"), Oklab, 9)
            .output("accent-subtle", 0.75)
            .output("accent-faint", 0.875),
        Recipe::new("accent-strong", Base("accent"), Fixed(Color::BLACK), HctTone, 11)
            .schedule(ToneSchedule::Ease)
            .output("accent-strong", 0.6),
        Recipe::new("accent-light", Base("accent"), Fixed(Color::WHITE), HctTone, 11)
            .schedule(ToneSchedule::Ease)
            .output("accent-light", 0.6),
        Recipe::new("cursor-muted", Base("cursor"), Base("background"), Cam16Jmh, 9)
            .output("cursor-muted", 0.5),
        Recipe::new("selection-muted", Base("selection"), Base("background"), Linear, 9)
            .output("selection-muted", 0.5),
    ];

    for name in ANSI_NAMES {
        recipes.push(
            Recipe::new(&format!("{name}-dim"), Base(name), Base("background"), Okhsv, 9)
                .output(&format!("{name}-dim"), 0.375),
        );
        recipes.push(
            Recipe::new(&format!("{name}-bright"), Base(name), Fixed(Color::WHITE), Hct, 9)
                .output(&format!("{name}-bright"), 0.25),
        );
    }

    recipes
});

/// Output colours by name, serialised as a name to hex map in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NamedColorSet(BTreeMap<String, Color>);

impl NamedColorSet {
    pub fn new() -> Self {
        NamedColorSet::default()
    }

    pub fn get(&self, name: &str) -> Option<Color> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, color: Color) {
        self.0.insert(name.into(), color);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.0.iter().map(|(name, color)| (name.as_str(), *color))
    }
}

enum Outcome {
    Skipped,
    Derived(Vec<(String, Color)>),
}

fn resolve(endpoint: Endpoint, bases: &HashMap<String, String>) -> Result<Option<Color>> {
    match endpoint {
        Endpoint::Fixed(color) => Ok(Some(color)),
        Endpoint::Base(name) => bases.get(name).map(|hex| Color::from_hex(hex)).transpose(),
    }
}

fn run<S: RampService>(
    service: &S,
    recipe: &Recipe,
    bases: &HashMap<String, String>,
) -> Result<Outcome> {
    let (Some(from), Some(to)) = (resolve(recipe.from, bases)?, resolve(recipe.to, bases)?) else {
        return Ok(Outcome::Skipped);
    };

    let request =
        RampRequest::new(from, to, recipe.steps, recipe.algorithm).with_schedule(recipe.schedule);
    let ramp = service.query(&request)?;

    Ok(Outcome::Derived(
        recipe
            .outputs
            .iter()
            .filter_map(|(name, t)| ramp.sample(*t).map(|color| (name.clone(), color)))
            .collect(),
    ))
}

/// Derives a named theme from `bases` (name to hex).
///
/// Every recipe runs independently and in parallel. A recipe whose inputs are
/// missing is skipped; one whose query fails is logged and left out. Neither
/// affects the other recipes. Valid base colours are carried into the output
/// unchanged.
pub fn derive_theme<S: RampService>(service: &S, bases: &HashMap<String, String>) -> NamedColorSet {
    let mut set = NamedColorSet::new();

    for (name, hex) in bases {
        if !BASE_NAMES.contains(&name.as_str()) {
            debug!(name = %name, "ignoring unknown base color");
            continue;
        }

        match Color::from_hex(hex) {
            Ok(color) => set.insert(name.clone(), color),
            Err(error) => warn!(name = %name, %error, "invalid base color"),
        }
    }

    let outcomes: Vec<(&Recipe, Result<Outcome>)> = RECIPES
        .par_iter()
        .map(|recipe| (recipe, run(service, recipe, bases)))
        .collect();

    for (recipe, outcome) in outcomes {
        match outcome {
            Ok(Outcome::Derived(colors)) => {
                for (name, color) in colors {
                    set.insert(name, color);
                }
            }
            Ok(Outcome::Skipped) => {
                let missing: Vec<&str> = recipe
                    .bases()
                    .filter(|base| !bases.contains_key(*base))
                    .collect();
                debug!(recipe = %recipe.name, ?missing, "skipped recipe with missing inputs");
            }
            Err(error) => {
                warn!(recipe = %recipe.name, %error, "recipe failed, its outputs are omitted");
            }
        }
    }

    set
}
