// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration store: recognized options, defaults, merging, and typed mutation.
//!
//! ## Overview
//!
//! A [`Config`] is an owned snapshot. It is built by merging a partial [`Options`] (or string keyed
//! pairs) over the defaults, and mutated one key at a time with [`Config::set`].
//! Every instance owns its own snapshot; there is no shared default object.
//!
//! ## Defaults
//!
//! | Option | Default |
//! |---|---|
//! | `navLinksSelector` | `"nav a"` |
//! | `navLinkActiveClass` / `sectionActiveClass` | `"active"` |
//! | `defaultActiveElement` | unset (first link) |
//! | `changeOffset` | `50` |
//! | `defaultLinkActive`, `updateATagClass`, `saveHashBetweenSections` | `true` |
//! | `setClassesOnSections`, `exactMatch`, `updateHash`, `debugLine` | `false` |
//! | `parentsObtainingActiveClass`, `allowedPaths`, `onInit`, `onChange` | empty |

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use tracing::warn;

use crate::engine::NavigationState;
use crate::error::{CallbackError, ConfigError};
use crate::resolve::Policy;

/// A user callback.
///
/// Both `onInit` and `onChange` callbacks receive the full [`NavigationState`], which carries the
/// current and previous sections.
pub type Callback<E> = Rc<dyn Fn(&NavigationState<E>) -> Result<(), CallbackError>>;

/// Wrap a closure as a [`Callback`].
pub fn callback<E, F>(f: F) -> Callback<E>
where
    F: Fn(&NavigationState<E>) -> Result<(), CallbackError> + 'static,
{
    Rc::new(f)
}

bitflags::bitflags! {
    /// Boolean behaviour switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Behavior: u8 {
        /// Highlight the default element when no section is active.
        const DEFAULT_LINK_ACTIVE        = 0b0000_0001;
        /// Mutate the class list of link elements.
        const UPDATE_LINK_CLASS          = 0b0000_0010;
        /// Mutate the class list of section elements.
        const SECTION_CLASSES            = 0b0000_0100;
        /// Use exact containment instead of nearest preceding.
        const EXACT_MATCH                = 0b0000_1000;
        /// Mirror the active section into the location fragment.
        const UPDATE_HASH                = 0b0001_0000;
        /// Keep the fragment while the trigger line is in a gap (exact match only).
        const SAVE_HASH_BETWEEN_SECTIONS = 0b0010_0000;
        /// Show the debug line.
        const DEBUG_LINE                 = 0b0100_0000;
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::DEFAULT_LINK_ACTIVE | Self::UPDATE_LINK_CLASS | Self::SAVE_HASH_BETWEEN_SECTIONS
    }
}

/// The closed set of recognized option names.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OptionKey {
    /// `navLinksSelector`
    NavLinksSelector,
    /// `navLinkActiveClass`
    NavLinkActiveClass,
    /// `sectionActiveClass`
    SectionActiveClass,
    /// `defaultActiveElement`
    DefaultActiveElement,
    /// `changeOffset`
    ChangeOffset,
    /// `defaultLinkActive`
    DefaultLinkActive,
    /// `updateATagClass`
    UpdateLinkClass,
    /// `setClassesOnSections`
    SetClassesOnSections,
    /// `exactMatch`
    ExactMatch,
    /// `updateHash`
    UpdateHash,
    /// `saveHashBetweenSections`
    SaveHashBetweenSections,
    /// `parentsObtainingActiveClass`
    ParentsObtainingActiveClass,
    /// `allowedPaths`
    AllowedPaths,
    /// `onInit`
    OnInit,
    /// `onChange`
    OnChange,
    /// `debugLine`
    DebugLine,
}

impl OptionKey {
    /// Every recognized key.
    pub const ALL: [Self; 16] = [
        Self::NavLinksSelector,
        Self::NavLinkActiveClass,
        Self::SectionActiveClass,
        Self::DefaultActiveElement,
        Self::ChangeOffset,
        Self::DefaultLinkActive,
        Self::UpdateLinkClass,
        Self::SetClassesOnSections,
        Self::ExactMatch,
        Self::UpdateHash,
        Self::SaveHashBetweenSections,
        Self::ParentsObtainingActiveClass,
        Self::AllowedPaths,
        Self::OnInit,
        Self::OnChange,
        Self::DebugLine,
    ];

    /// The option's external name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NavLinksSelector => "navLinksSelector",
            Self::NavLinkActiveClass => "navLinkActiveClass",
            Self::SectionActiveClass => "sectionActiveClass",
            Self::DefaultActiveElement => "defaultActiveElement",
            Self::ChangeOffset => "changeOffset",
            Self::DefaultLinkActive => "defaultLinkActive",
            Self::UpdateLinkClass => "updateATagClass",
            Self::SetClassesOnSections => "setClassesOnSections",
            Self::ExactMatch => "exactMatch",
            Self::UpdateHash => "updateHash",
            Self::SaveHashBetweenSections => "saveHashBetweenSections",
            Self::ParentsObtainingActiveClass => "parentsObtainingActiveClass",
            Self::AllowedPaths => "allowedPaths",
            Self::OnInit => "onInit",
            Self::OnChange => "onChange",
            Self::DebugLine => "debugLine",
        }
    }

    /// Kind of value the option accepts.
    pub const fn expected(self) -> &'static str {
        match self {
            Self::NavLinksSelector
            | Self::NavLinkActiveClass
            | Self::SectionActiveClass
            | Self::DefaultActiveElement => "a string",
            Self::ChangeOffset => "a number",
            Self::DefaultLinkActive
            | Self::UpdateLinkClass
            | Self::SetClassesOnSections
            | Self::ExactMatch
            | Self::UpdateHash
            | Self::SaveHashBetweenSections
            | Self::DebugLine => "a boolean",
            Self::ParentsObtainingActiveClass | Self::AllowedPaths => "a list of strings",
            Self::OnInit | Self::OnChange => "a list of callbacks",
        }
    }

    /// The flag backing a boolean option.
    const fn flag(self) -> Option<Behavior> {
        match self {
            Self::DefaultLinkActive => Some(Behavior::DEFAULT_LINK_ACTIVE),
            Self::UpdateLinkClass => Some(Behavior::UPDATE_LINK_CLASS),
            Self::SetClassesOnSections => Some(Behavior::SECTION_CLASSES),
            Self::ExactMatch => Some(Behavior::EXACT_MATCH),
            Self::UpdateHash => Some(Behavior::UPDATE_HASH),
            Self::SaveHashBetweenSections => Some(Behavior::SAVE_HASH_BETWEEN_SECTIONS),
            Self::DebugLine => Some(Behavior::DEBUG_LINE),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownOption(s.to_string()))
    }
}

/// A typed option value.
pub enum OptionValue<E> {
    /// The unset sentinel: dropped when merging, restores the default when set.
    Unset,
    /// Selector or class name.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean switch.
    Flag(bool),
    /// Selector or pattern list.
    List(Vec<String>),
    /// Callback list.
    Callbacks(Vec<Callback<E>>),
}

impl<E> Clone for OptionValue<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Text(s) => Self::Text(s.clone()),
            Self::Number(n) => Self::Number(*n),
            Self::Flag(b) => Self::Flag(*b),
            Self::List(l) => Self::List(l.clone()),
            Self::Callbacks(c) => Self::Callbacks(c.clone()),
        }
    }
}

impl<E> fmt::Debug for OptionValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            Self::List(l) => f.debug_tuple("List").field(l).finish(),
            Self::Callbacks(c) => f.debug_tuple("Callbacks").field(&c.len()).finish(),
        }
    }
}

impl<E> PartialEq for OptionValue<E> {
    /// Callback lists compare by identity of their entries.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unset, Self::Unset) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Flag(a), Self::Flag(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Callbacks(a), Self::Callbacks(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
            }
            _ => false,
        }
    }
}

impl<E> From<&str> for OptionValue<E> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<E> From<String> for OptionValue<E> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<E> From<f64> for OptionValue<E> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<E> From<bool> for OptionValue<E> {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<E> From<Vec<String>> for OptionValue<E> {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<E> From<Vec<Callback<E>>> for OptionValue<E> {
    fn from(value: Vec<Callback<E>>) -> Self {
        Self::Callbacks(value)
    }
}

/// Partial, user supplied overrides. `None` fields keep the default.
pub struct Options<E> {
    /// See [`OptionKey::NavLinksSelector`].
    pub nav_links_selector: Option<String>,
    /// See [`OptionKey::NavLinkActiveClass`].
    pub nav_link_active_class: Option<String>,
    /// See [`OptionKey::SectionActiveClass`].
    pub section_active_class: Option<String>,
    /// See [`OptionKey::DefaultActiveElement`].
    pub default_active_element: Option<String>,
    /// See [`OptionKey::ChangeOffset`].
    pub change_offset: Option<f64>,
    /// See [`OptionKey::DefaultLinkActive`].
    pub default_link_active: Option<bool>,
    /// See [`OptionKey::UpdateLinkClass`].
    pub update_link_class: Option<bool>,
    /// See [`OptionKey::SetClassesOnSections`].
    pub set_classes_on_sections: Option<bool>,
    /// See [`OptionKey::ExactMatch`].
    pub exact_match: Option<bool>,
    /// See [`OptionKey::UpdateHash`].
    pub update_hash: Option<bool>,
    /// See [`OptionKey::SaveHashBetweenSections`].
    pub save_hash_between_sections: Option<bool>,
    /// See [`OptionKey::ParentsObtainingActiveClass`].
    pub parents_obtaining_active_class: Option<Vec<String>>,
    /// See [`OptionKey::AllowedPaths`].
    pub allowed_paths: Option<Vec<String>>,
    /// See [`OptionKey::OnInit`].
    pub on_init: Option<Vec<Callback<E>>>,
    /// See [`OptionKey::OnChange`].
    pub on_change: Option<Vec<Callback<E>>>,
    /// See [`OptionKey::DebugLine`].
    pub debug_line: Option<bool>,
}

impl<E> Default for Options<E> {
    fn default() -> Self {
        Self {
            nav_links_selector: None,
            nav_link_active_class: None,
            section_active_class: None,
            default_active_element: None,
            change_offset: None,
            default_link_active: None,
            update_link_class: None,
            set_classes_on_sections: None,
            exact_match: None,
            update_hash: None,
            save_hash_between_sections: None,
            parents_obtaining_active_class: None,
            allowed_paths: None,
            on_init: None,
            on_change: None,
            debug_line: None,
        }
    }
}

impl<E> fmt::Debug for Options<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("nav_links_selector", &self.nav_links_selector)
            .field("change_offset", &self.change_offset)
            .field("exact_match", &self.exact_match)
            .field("update_hash", &self.update_hash)
            .finish_non_exhaustive()
    }
}

impl<E> Options<E> {
    /// Flatten into key/value pairs, unset fields as [`OptionValue::Unset`].
    fn into_pairs(self) -> [(OptionKey, OptionValue<E>); 16] {
        fn opt<V, T: Into<OptionValue<V>>>(v: Option<T>) -> OptionValue<V> {
            v.map_or(OptionValue::Unset, Into::into)
        }
        [
            (OptionKey::NavLinksSelector, opt(self.nav_links_selector)),
            (OptionKey::NavLinkActiveClass, opt(self.nav_link_active_class)),
            (OptionKey::SectionActiveClass, opt(self.section_active_class)),
            (
                OptionKey::DefaultActiveElement,
                opt(self.default_active_element),
            ),
            (OptionKey::ChangeOffset, opt(self.change_offset)),
            (OptionKey::DefaultLinkActive, opt(self.default_link_active)),
            (OptionKey::UpdateLinkClass, opt(self.update_link_class)),
            (
                OptionKey::SetClassesOnSections,
                opt(self.set_classes_on_sections),
            ),
            (OptionKey::ExactMatch, opt(self.exact_match)),
            (OptionKey::UpdateHash, opt(self.update_hash)),
            (
                OptionKey::SaveHashBetweenSections,
                opt(self.save_hash_between_sections),
            ),
            (
                OptionKey::ParentsObtainingActiveClass,
                opt(self.parents_obtaining_active_class),
            ),
            (OptionKey::AllowedPaths, opt(self.allowed_paths)),
            (OptionKey::OnInit, opt(self.on_init)),
            (OptionKey::OnChange, opt(self.on_change)),
            (OptionKey::DebugLine, opt(self.debug_line)),
        ]
    }
}

/// A validated configuration snapshot.
pub struct Config<E> {
    nav_links_selector: String,
    nav_link_active_class: String,
    section_active_class: String,
    default_active_element: Option<String>,
    change_offset: f64,
    flags: Behavior,
    parents_obtaining_active_class: Vec<String>,
    allowed_paths: Vec<String>,
    on_init: Vec<Callback<E>>,
    on_change: Vec<Callback<E>>,
}

impl<E> Default for Config<E> {
    fn default() -> Self {
        Self {
            nav_links_selector: "nav a".to_string(),
            nav_link_active_class: "active".to_string(),
            section_active_class: "active".to_string(),
            default_active_element: None,
            change_offset: 50.0,
            flags: Behavior::default(),
            parents_obtaining_active_class: Vec::new(),
            allowed_paths: Vec::new(),
            on_init: Vec::new(),
            on_change: Vec::new(),
        }
    }
}

impl<E> Clone for Config<E> {
    fn clone(&self) -> Self {
        Self {
            nav_links_selector: self.nav_links_selector.clone(),
            nav_link_active_class: self.nav_link_active_class.clone(),
            section_active_class: self.section_active_class.clone(),
            default_active_element: self.default_active_element.clone(),
            change_offset: self.change_offset,
            flags: self.flags,
            parents_obtaining_active_class: self.parents_obtaining_active_class.clone(),
            allowed_paths: self.allowed_paths.clone(),
            on_init: self.on_init.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<E> fmt::Debug for Config<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("nav_links_selector", &self.nav_links_selector)
            .field("nav_link_active_class", &self.nav_link_active_class)
            .field("section_active_class", &self.section_active_class)
            .field("default_active_element", &self.default_active_element)
            .field("change_offset", &self.change_offset)
            .field("flags", &self.flags)
            .field(
                "parents_obtaining_active_class",
                &self.parents_obtaining_active_class,
            )
            .field("allowed_paths", &self.allowed_paths)
            .field("on_init", &self.on_init.len())
            .field("on_change", &self.on_change.len())
            .finish()
    }
}

impl<E> Config<E> {
    /// Merge `options` over the defaults.
    pub fn from_options(options: Options<E>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (key, value) in options.into_pairs() {
            if !matches!(value, OptionValue::Unset) {
                config.set(key, value)?;
            }
        }
        Ok(config)
    }

    /// Merge string keyed overrides over the defaults.
    ///
    /// Unrecognized names are logged and ignored; unset values are dropped.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, OptionValue<E>)>,
    {
        let mut config = Self::default();
        for (name, value) in pairs {
            let Ok(key) = name.parse::<OptionKey>() else {
                warn!(option = name, "ignoring unknown option");
                continue;
            };
            if !matches!(value, OptionValue::Unset) {
                config.set(key, value)?;
            }
        }
        Ok(config)
    }

    /// Set one option.
    ///
    /// [`OptionValue::Unset`] restores the default. `changeOffset` is clamped to `[0, 100]`.
    /// An empty `defaultActiveElement` is stored as "no selector" and reads back as
    /// [`OptionValue::Unset`].
    pub fn set(&mut self, key: OptionKey, value: OptionValue<E>) -> Result<(), ConfigError> {
        if matches!(value, OptionValue::Unset) {
            return self.reset(key);
        }
        let mismatch = || ConfigError::TypeMismatch {
            key,
            expected: key.expected(),
        };
        if let Some(flag) = key.flag() {
            let OptionValue::Flag(on) = value else {
                return Err(mismatch());
            };
            self.flags.set(flag, on);
            return Ok(());
        }
        match (key, value) {
            (OptionKey::NavLinksSelector, OptionValue::Text(s)) => self.nav_links_selector = s,
            (OptionKey::NavLinkActiveClass, OptionValue::Text(s)) => {
                self.nav_link_active_class = s;
            }
            (OptionKey::SectionActiveClass, OptionValue::Text(s)) => {
                self.section_active_class = s;
            }
            (OptionKey::DefaultActiveElement, OptionValue::Text(s)) => {
                self.default_active_element = (!s.is_empty()).then_some(s);
            }
            (OptionKey::ChangeOffset, OptionValue::Number(n)) => {
                if n.is_nan() {
                    return Err(ConfigError::InvalidNumber { key });
                }
                self.change_offset = n.clamp(0.0, 100.0);
            }
            (OptionKey::ParentsObtainingActiveClass, OptionValue::List(l)) => {
                self.parents_obtaining_active_class = l;
            }
            (OptionKey::AllowedPaths, OptionValue::List(l)) => self.allowed_paths = l,
            (OptionKey::OnInit, OptionValue::Callbacks(c)) => self.on_init = c,
            (OptionKey::OnChange, OptionValue::Callbacks(c)) => self.on_change = c,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    fn reset(&mut self, key: OptionKey) -> Result<(), ConfigError> {
        let defaults = Self::default();
        if let Some(flag) = key.flag() {
            self.flags.set(flag, defaults.flags.contains(flag));
            return Ok(());
        }
        match key {
            OptionKey::NavLinksSelector => self.nav_links_selector = defaults.nav_links_selector,
            OptionKey::NavLinkActiveClass => {
                self.nav_link_active_class = defaults.nav_link_active_class;
            }
            OptionKey::SectionActiveClass => {
                self.section_active_class = defaults.section_active_class;
            }
            OptionKey::DefaultActiveElement => self.default_active_element = None,
            OptionKey::ChangeOffset => self.change_offset = defaults.change_offset,
            OptionKey::ParentsObtainingActiveClass => self.parents_obtaining_active_class.clear(),
            OptionKey::AllowedPaths => self.allowed_paths.clear(),
            OptionKey::OnInit => self.on_init.clear(),
            OptionKey::OnChange => self.on_change.clear(),
            _ => unreachable!("boolean options are handled through their flag"),
        }
        Ok(())
    }

    /// Read one option back.
    pub fn get(&self, key: OptionKey) -> OptionValue<E> {
        if let Some(flag) = key.flag() {
            return OptionValue::Flag(self.flags.contains(flag));
        }
        match key {
            OptionKey::NavLinksSelector => OptionValue::Text(self.nav_links_selector.clone()),
            OptionKey::NavLinkActiveClass => {
                OptionValue::Text(self.nav_link_active_class.clone())
            }
            OptionKey::SectionActiveClass => OptionValue::Text(self.section_active_class.clone()),
            OptionKey::DefaultActiveElement => self
                .default_active_element
                .clone()
                .map_or(OptionValue::Unset, OptionValue::Text),
            OptionKey::ChangeOffset => OptionValue::Number(self.change_offset),
            OptionKey::ParentsObtainingActiveClass => {
                OptionValue::List(self.parents_obtaining_active_class.clone())
            }
            OptionKey::AllowedPaths => OptionValue::List(self.allowed_paths.clone()),
            OptionKey::OnInit => OptionValue::Callbacks(self.on_init.clone()),
            OptionKey::OnChange => OptionValue::Callbacks(self.on_change.clone()),
            _ => unreachable!("boolean options are handled through their flag"),
        }
    }

    /// Selector for navigation links.
    pub fn nav_links_selector(&self) -> &str {
        &self.nav_links_selector
    }

    /// Class applied to active links and their configured ancestors.
    pub fn nav_link_active_class(&self) -> &str {
        &self.nav_link_active_class
    }

    /// Class applied to the active section.
    pub fn section_active_class(&self) -> &str {
        &self.section_active_class
    }

    /// Selector for the fallback element, if configured.
    pub fn default_active_element(&self) -> Option<&str> {
        self.default_active_element.as_deref()
    }

    /// Trigger line position in percent of the viewport height, within `[0, 100]`.
    pub fn change_offset(&self) -> f64 {
        self.change_offset
    }

    /// Boolean switches.
    pub fn flags(&self) -> Behavior {
        self.flags
    }

    /// Resolution policy selected by `exactMatch`.
    pub fn policy(&self) -> Policy {
        if self.flags.contains(Behavior::EXACT_MATCH) {
            Policy::ExactContainment
        } else {
            Policy::NearestPreceding
        }
    }

    /// Ancestor selectors that also receive the link class.
    pub fn parents_obtaining_active_class(&self) -> &[String] {
        &self.parents_obtaining_active_class
    }

    /// Location path patterns gating initialization.
    pub fn allowed_paths(&self) -> &[String] {
        &self.allowed_paths
    }

    /// Callbacks run after each initialization.
    pub fn on_init(&self) -> &[Callback<E>] {
        &self.on_init
    }

    /// Callbacks run on each transition.
    pub fn on_change(&self) -> &[Callback<E>] {
        &self.on_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    type Cfg = Config<u32>;

    #[test]
    fn empty_default_element_reads_back_unset() {
        let mut c = Cfg::default();
        c.set(OptionKey::DefaultActiveElement, OptionValue::Text(".home".into()))
            .unwrap();
        assert_eq!(c.default_active_element(), Some(".home"));
        c.set(OptionKey::DefaultActiveElement, OptionValue::Text(String::new()))
            .unwrap();
        assert_eq!(c.default_active_element(), None);
        assert_eq!(c.get(OptionKey::DefaultActiveElement), OptionValue::Unset);
    }

    #[test]
    fn defaults_match_documented_table() {
        let c = Cfg::default();
        assert_eq!(c.nav_links_selector(), "nav a");
        assert_eq!(c.nav_link_active_class(), "active");
        assert_eq!(c.section_active_class(), "active");
        assert_eq!(c.default_active_element(), None);
        assert_eq!(c.change_offset(), 50.0);
        assert_eq!(c.policy(), Policy::NearestPreceding);
        assert!(c.flags().contains(Behavior::DEFAULT_LINK_ACTIVE));
        assert!(c.flags().contains(Behavior::UPDATE_LINK_CLASS));
        assert!(c.flags().contains(Behavior::SAVE_HASH_BETWEEN_SECTIONS));
        assert!(!c.flags().contains(Behavior::UPDATE_HASH));
        assert!(!c.flags().contains(Behavior::DEBUG_LINE));
    }

    #[test]
    fn options_merge_over_defaults() {
        let c = Cfg::from_options(Options {
            change_offset: Some(33.0),
            debug_line: Some(true),
            ..Options::default()
        })
        .unwrap();
        assert_eq!(c.change_offset(), 33.0);
        assert!(c.flags().contains(Behavior::DEBUG_LINE));
        // Untouched keys keep their defaults.
        assert_eq!(c.nav_links_selector(), "nav a");
        assert!(c.flags().contains(Behavior::DEFAULT_LINK_ACTIVE));
    }

    #[test]
    fn instances_do_not_share_defaults() {
        let mut a = Cfg::default();
        a.set(OptionKey::NavLinkActiveClass, "current".into())
            .unwrap();
        let b = Cfg::default();
        assert_eq!(b.nav_link_active_class(), "active");
    }

    #[test]
    fn change_offset_is_clamped() {
        let mut c = Cfg::default();
        c.set(OptionKey::ChangeOffset, OptionValue::Number(150.0)).unwrap();
        assert_eq!(c.change_offset(), 100.0);
        c.set(OptionKey::ChangeOffset, OptionValue::Number(-5.0)).unwrap();
        assert_eq!(c.change_offset(), 0.0);
        assert_eq!(
            c.set(OptionKey::ChangeOffset, OptionValue::Number(f64::NAN)),
            Err(ConfigError::InvalidNumber {
                key: OptionKey::ChangeOffset
            })
        );
        assert_eq!(c.change_offset(), 0.0);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut c = Cfg::default();
        c.set(OptionKey::ExactMatch, true.into()).unwrap();
        assert_eq!(c.get(OptionKey::ExactMatch), OptionValue::Flag(true));
        assert_eq!(c.policy(), Policy::ExactContainment);

        let parents = vec!["li".to_string(), ".group".to_string()];
        c.set(OptionKey::ParentsObtainingActiveClass, parents.clone().into())
            .unwrap();
        assert_eq!(
            c.get(OptionKey::ParentsObtainingActiveClass),
            OptionValue::List(parents)
        );

        c.set(OptionKey::DefaultActiveElement, "#home".into())
            .unwrap();
        assert_eq!(
            c.get(OptionKey::DefaultActiveElement),
            OptionValue::Text("#home".to_string())
        );
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut c = Cfg::default();
        let err = c.set(OptionKey::ExactMatch, "yes".into()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TypeMismatch {
                key: OptionKey::ExactMatch,
                expected: "a boolean"
            }
        );
        assert!(c.set(OptionKey::ChangeOffset, true.into()).is_err());
        assert!(!c.flags().contains(Behavior::EXACT_MATCH));
    }

    #[test]
    fn unset_restores_default() {
        let mut c = Cfg::default();
        c.set(OptionKey::UpdateLinkClass, false.into()).unwrap();
        c.set(OptionKey::ChangeOffset, OptionValue::Number(10.0)).unwrap();
        c.set(OptionKey::UpdateLinkClass, OptionValue::Unset)
            .unwrap();
        c.set(OptionKey::ChangeOffset, OptionValue::Unset).unwrap();
        assert!(c.flags().contains(Behavior::UPDATE_LINK_CLASS));
        assert_eq!(c.change_offset(), 50.0);
    }

    #[test]
    fn key_names_parse_and_unknown_names_fail() {
        for key in OptionKey::ALL {
            assert_eq!(key.as_str().parse::<OptionKey>(), Ok(key));
        }
        assert_eq!(
            "scrollBehaviour".parse::<OptionKey>(),
            Err(ConfigError::UnknownOption("scrollBehaviour".to_string()))
        );
    }

    #[test]
    fn from_pairs_ignores_unknown_and_drops_unset() {
        let c = Cfg::from_pairs([
            ("changeOffset", OptionValue::Number(20.0)),
            ("bogus", OptionValue::Flag(true)),
            ("navLinksSelector", OptionValue::Unset),
            ("updateHash", OptionValue::Flag(true)),
        ])
        .unwrap();
        assert_eq!(c.change_offset(), 20.0);
        assert_eq!(c.nav_links_selector(), "nav a");
        assert!(c.flags().contains(Behavior::UPDATE_HASH));
    }

    #[test]
    fn callbacks_compare_by_identity() {
        let cb: Callback<u32> = callback(|_| Ok(()));
        let mut c = Cfg::default();
        c.set(OptionKey::OnChange, vec![cb.clone()].into()).unwrap();
        assert_eq!(c.on_change().len(), 1);
        assert_eq!(
            c.get(OptionKey::OnChange),
            OptionValue::Callbacks(vec![cb])
        );
        let other: Callback<u32> = callback(|_| Ok(()));
        assert_ne!(
            c.get(OptionKey::OnChange),
            OptionValue::Callbacks(vec![other])
        );
    }
}
