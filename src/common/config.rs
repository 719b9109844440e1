use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("rift-group")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct GroupSettings {
    /// Edge length of a tab slot thumbnail, in pixels.
    #[serde(default = "default_thumb_size")]
    pub thumb_size: i32,
    /// Gap between neighbouring slots and between the slots and the bar edge.
    #[serde(default = "default_thumb_space")]
    pub thumb_space: i32,
    #[serde(default = "default_drag_spring_k")]
    pub drag_spring_k: f32,
    #[serde(default = "default_drag_friction")]
    pub drag_friction: i32,
    #[serde(default = "default_drag_speed_limit")]
    pub drag_speed_limit: i32,
    /// Vertical distance at which a dragged slot stops pushing other slots.
    #[serde(default = "default_drag_y_distance")]
    pub drag_y_distance: i32,
    /// Duration of a complete tab change, in seconds. Each of the two
    /// phases takes half of it.
    #[serde(default = "default_change_animation_time")]
    pub change_animation_time: f32,
    #[serde(default = "default_tabbing_speed")]
    pub tabbing_speed: f32,
    #[serde(default = "default_tabbing_timestep")]
    pub tabbing_timestep: f32,
    /// Seconds a dragged tab has to hover over another slot before that slot
    /// is brought to the top.
    #[serde(default = "default_drag_hover_time")]
    pub drag_hover_time: f32,
    #[serde(default = "yes")]
    pub raise_all: bool,
    #[serde(default = "yes")]
    pub move_all: bool,
    #[serde(default = "yes")]
    pub minimize_all: bool,
    #[serde(default = "no")]
    pub shade_all: bool,
    /// Resizing a window resizes the other windows of its group by the same
    /// amount. Maximized windows are left alone.
    #[serde(default = "no")]
    pub resize_all: bool,
    #[serde(default = "no")]
    pub maximize_unmaximize_all: bool,
    /// Dissolve a group once it only holds a single window.
    #[serde(default = "yes")]
    pub auto_ungroup: bool,
    /// Every normal window gets a tabbed group of its own, both when it
    /// appears and when it leaves a group.
    #[serde(default = "no")]
    pub autotab_create: bool,
    /// Untab the group when its top tab is removed.
    #[serde(default = "no")]
    pub untab_on_close: bool,
    /// Dropping a dragged tab outside of every tab bar removes its window
    /// from the group.
    #[serde(default = "yes")]
    pub dnd_ungroup_window: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct SelectionSettings {
    /// Fraction of a window's area the selection rectangle has to cover.
    #[serde(default = "default_select_precision")]
    pub precision: f32,
    #[serde(default = "no")]
    pub include_shaded: bool,
    /// Group the selected windows as soon as a rubber band selection ends.
    #[serde(default = "no")]
    pub auto_group: bool,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            thumb_size: default_thumb_size(),
            thumb_space: default_thumb_space(),
            drag_spring_k: default_drag_spring_k(),
            drag_friction: default_drag_friction(),
            drag_speed_limit: default_drag_speed_limit(),
            drag_y_distance: default_drag_y_distance(),
            change_animation_time: default_change_animation_time(),
            tabbing_speed: default_tabbing_speed(),
            tabbing_timestep: default_tabbing_timestep(),
            drag_hover_time: default_drag_hover_time(),
            raise_all: true,
            move_all: true,
            minimize_all: true,
            shade_all: false,
            resize_all: false,
            maximize_unmaximize_all: false,
            auto_ungroup: true,
            autotab_create: false,
            untab_on_close: false,
            dnd_ungroup_window: true,
        }
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            precision: default_select_precision(),
            include_shaded: false,
            auto_group: false,
        }
    }
}

impl GroupSettings {
    /// Length of one tab change phase in milliseconds.
    pub fn change_phase_ms(&self) -> i32 { (self.change_animation_time * 500.0) as i32 }

    pub fn drag_hover_ms(&self) -> u32 { (self.drag_hover_time * 1000.0).max(0.0) as u32 }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.thumb_size <= 0 {
            issues.push(format!("thumb_size must be positive, got {}", self.thumb_size));
        }

        if self.thumb_space < 0 {
            issues.push(format!(
                "thumb_space must be non-negative, got {}",
                self.thumb_space
            ));
        }

        if self.drag_spring_k <= 0.0 {
            issues.push(format!(
                "drag_spring_k must be positive, got {}",
                self.drag_spring_k
            ));
        }

        if self.drag_friction < 0 {
            issues.push(format!(
                "drag_friction must be non-negative, got {}",
                self.drag_friction
            ));
        }

        if self.drag_speed_limit <= 0 {
            issues.push(format!(
                "drag_speed_limit must be positive, got {}",
                self.drag_speed_limit
            ));
        }

        if self.drag_y_distance <= 0 {
            issues.push(format!(
                "drag_y_distance must be positive, got {}",
                self.drag_y_distance
            ));
        }

        if self.change_animation_time < 0.0 {
            issues.push(format!(
                "change_animation_time must be non-negative, got {}",
                self.change_animation_time
            ));
        }

        if self.tabbing_speed <= 0.0 {
            issues.push(format!(
                "tabbing_speed must be positive, got {}",
                self.tabbing_speed
            ));
        }

        if self.tabbing_timestep <= 0.0 {
            issues.push(format!(
                "tabbing_timestep must be positive, got {}",
                self.tabbing_timestep
            ));
        }

        if self.drag_hover_time < 0.0 {
            issues.push(format!(
                "drag_hover_time must be non-negative, got {}",
                self.drag_hover_time
            ));
        }

        issues
    }
}

impl SelectionSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(0.0..=1.0).contains(&self.precision) {
            issues.push(format!(
                "selection.precision must be between 0 and 1, got {}",
                self.precision
            ));
        }

        issues
    }
}

fn yes() -> bool { true }
fn no() -> bool { false }

fn default_thumb_size() -> i32 { 96 }
fn default_thumb_space() -> i32 { 5 }
fn default_drag_spring_k() -> f32 { 8.0 }
fn default_drag_friction() -> i32 { 35 }
fn default_drag_speed_limit() -> i32 { 800 }
fn default_drag_y_distance() -> i32 { 300 }
fn default_change_animation_time() -> f32 { 0.5 }
fn default_tabbing_speed() -> f32 { 1.2 }
fn default_tabbing_timestep() -> f32 { 1.5 }
fn default_drag_hover_time() -> f32 { 0.5 }
fn default_select_precision() -> f32 { 0.25 }

#[derive(Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: GroupSettings,
    #[serde(default)]
    selection: SelectionSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub settings: GroupSettings,
    pub selection: SelectionSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse(include_str!("../../rift-group.default.toml")).unwrap_or_else(|_| Config {
            settings: GroupSettings::default(),
            selection: SelectionSettings::default(),
        })
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile {
            settings: self.settings.clone(),
            selection: self.selection.clone(),
        };

        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.settings.validate();
        issues.extend(self.selection.validate());
        issues
    }

    /// Fails with every validation issue, one per line.
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        let issues = self.validate();
        if !issues.is_empty() {
            bail!("{}", issues.join("\n"));
        }
        Ok(())
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<ConfigFile>(buf) {
            Ok(c) => Ok(Config {
                settings: c.settings,
                selection: c.selection,
            }),
            Err(e) => {
                let msg = e.to_string();
                match Self::suggest_field(&msg) {
                    Some(suggestion) => bail!("{msg}\nDid you mean `{suggestion}`?"),
                    None => bail!("{msg}"),
                }
            }
        }
    }

    // serde reports unknown keys as "unknown field `x`, expected one of `a`, `b`".
    fn suggest_field(err: &str) -> Option<String> {
        let needle = "unknown field `";
        let start = err.find(needle)? + needle.len();
        let unknown = &err[start..start + err[start..].find('`')?];
        let candidates = err[start + unknown.len() + 1..]
            .split('`')
            .skip(1)
            .step_by(2)
            .filter(|c| !c.is_empty());

        let (best, dist) = candidates
            .map(|c| (c, Self::edit_distance(unknown, c)))
            .min_by_key(|&(_, d)| d)?;
        (dist <= usize::max(2, best.len() / 3)).then(|| best.to_string())
    }

    fn edit_distance(a: &str, b: &str) -> usize {
        let b: Vec<char> = b.chars().collect();
        let mut prev: Vec<usize> = (0..=b.len()).collect();
        for (i, ca) in a.chars().enumerate() {
            let mut row = vec![i + 1; b.len() + 1];
            for (j, cb) in b.iter().enumerate() {
                let substitute = prev[j] + usize::from(ca != *cb);
                row[j + 1] = substitute.min(prev[j + 1] + 1).min(row[j] + 1);
            }
            prev = row;
        }
        prev[b.len()]
    }
}
