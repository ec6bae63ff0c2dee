// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State transition engine: resolution cycles and the change-driven update pipeline.
//!
//! ## Resolution cycle
//!
//! Each scroll event (and each (re)initialization) runs one cycle:
//!
//! 1) `previous := current`.
//! 2) Resolve the candidate section for the current trigger line under the configured policy.
//! 3) `current := candidate`.
//! 4) If `current != previous`, or this is the first cycle since (re)initialization, run the pipeline:
//!    - clear every class the previous run applied, then sweep link and section classes;
//!    - with no active section, highlight the default element (if enabled);
//!    - otherwise highlight the section (if enabled) and every link pointing at it;
//!    - synchronize the location fragment;
//!    - invoke every `onChange` callback with the [`NavigationState`].
//! 5) Otherwise nothing is mutated and no callback runs.
//!
//! ## Lifecycle
//!
//! Construction and every [`ScrollSpy::set`] / [`ScrollSpy::refresh`] re-run initialization in full:
//! remove the highlighting applied under the previous configuration, validate the new one,
//! gate on the location path, re-resolve links and sections,
//! re-bind the scroll listener, run one forced cycle, then run the `onInit` callbacks.
//! The listener id is allocated once per instance, so re-binding always unbinds exactly
//! the binding made before it.
//!
//! Applied classes are recorded as `(element, class)` pairs. Changing the link selector,
//! a class name, or `setClassesOnSections`, and [`ScrollSpy::detach`], remove exactly those,
//! so nothing stale survives a reconfiguration.
//!
//! ## Callbacks
//!
//! Callbacks are isolated from each other: a failing callback is logged and reported in
//! [`Update::callback_failures`], and the remaining callbacks still run.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use tracing::{debug, trace, warn};

use crate::config::{Behavior, Callback, Config, OptionKey, OptionValue, Options};
use crate::error::{CallbackError, ConfigError, Error};
use crate::gate::PathGate;
use crate::hash::fragment_action;
use crate::host::{Host, ListenerId};
use crate::registry::{Registry, Section};
use crate::resolve::trigger_line;

/// The resolver's view of the active section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState<E> {
    current: Option<Section<E>>,
    previous: Option<Section<E>>,
    newly_initialized: bool,
}

impl<E> Default for NavigationState<E> {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
            newly_initialized: true,
        }
    }
}

impl<E: PartialEq> NavigationState<E> {
    /// The active section.
    pub fn current(&self) -> Option<&Section<E>> {
        self.current.as_ref()
    }

    /// The section that was active before the latest cycle.
    pub fn previous(&self) -> Option<&Section<E>> {
        self.previous.as_ref()
    }

    /// Whether the latest cycle changed the active section.
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    /// Whether the latest cycle is the first since (re)initialization.
    pub fn newly_initialized(&self) -> bool {
        self.newly_initialized
    }
}

/// Outcome of one cycle or initialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Update {
    /// Whether the update pipeline ran.
    pub pipeline_ran: bool,
    /// Errors returned by callbacks during this call, in invocation order.
    pub callback_failures: Vec<CallbackError>,
}

impl Update {
    /// Whether nothing was mutated and no callback ran.
    pub fn is_noop(&self) -> bool {
        !self.pipeline_ran && self.callback_failures.is_empty()
    }
}

/// Scroll-spy instance.
///
/// The instance owns its configuration, registry, and [`NavigationState`]; the host is
/// borrowed for the duration of each call.
///
/// ## Usage
///
/// - Construct with [`ScrollSpy::new`] (fails on an empty link selector) or
///   [`ScrollSpy::lenient`] (logs and stays inert instead).
/// - Forward every scroll event for [`ScrollSpy::listener`] to [`ScrollSpy::on_scroll`].
/// - Reconfigure with [`ScrollSpy::set`] / [`ScrollSpy::set_by_name`], or re-resolve
///   with [`ScrollSpy::refresh`] after the document changed.
/// - Tear down with [`ScrollSpy::detach`].
pub struct ScrollSpy<E> {
    config: Config<E>,
    registry: Registry<E>,
    state: NavigationState<E>,
    default_active: Option<E>,
    applied: Vec<(E, String)>,
    listener: ListenerId,
    bound: bool,
    armed: bool,
    strict: bool,
}

impl<E: fmt::Debug> fmt::Debug for ScrollSpy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSpy")
            .field("config", &self.config)
            .field("links", &self.registry.links().len())
            .field("sections", &self.registry.sections().len())
            .field("state", &self.state)
            .field("applied", &self.applied.len())
            .field("listener", &self.listener)
            .field("bound", &self.bound)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

impl<E: Clone + Eq + fmt::Debug> ScrollSpy<E> {
    /// Create and initialize a scroll-spy, failing on invalid configuration.
    pub fn new<H>(config: Config<E>, host: &mut H) -> Result<Self, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        let mut spy = Self::unarmed(config, true);
        spy.initialize(host)?;
        Ok(spy)
    }

    /// Merge `options` over the defaults, then behave like [`ScrollSpy::new`].
    pub fn with_options<H>(options: Options<E>, host: &mut H) -> Result<Self, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        Self::new(Config::from_options(options)?, host)
    }

    /// Create and initialize a scroll-spy that degrades to an inert instance on
    /// invalid configuration instead of failing.
    pub fn lenient<H>(config: Config<E>, host: &mut H) -> Self
    where
        H: Host<Element = E> + ?Sized,
    {
        let mut spy = Self::unarmed(config, false);
        if let Err(err) = spy.initialize(host) {
            warn!(%err, "scroll-spy initialization failed");
        }
        spy
    }

    fn unarmed(config: Config<E>, strict: bool) -> Self {
        Self {
            config,
            registry: Registry::new(),
            state: NavigationState::default(),
            default_active: None,
            applied: Vec::new(),
            listener: ListenerId::next(),
            bound: false,
            armed: false,
            strict,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &Config<E> {
        &self.config
    }

    /// Resolved links and sections.
    pub fn registry(&self) -> &Registry<E> {
        &self.registry
    }

    /// Current navigation state.
    pub fn state(&self) -> &NavigationState<E> {
        &self.state
    }

    /// The element highlighted when no section is active.
    pub fn default_active(&self) -> Option<&E> {
        self.default_active.as_ref()
    }

    /// This instance's scroll listener id.
    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    /// Whether the scroll listener is currently bound.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Whether scroll events are processed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Set one option and re-run initialization.
    ///
    /// In strict mode an invalid resulting configuration is rejected and the
    /// previous configuration stays in effect.
    pub fn set<H>(
        &mut self,
        key: OptionKey,
        value: OptionValue<E>,
        host: &mut H,
    ) -> Result<Update, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        let mut next = self.config.clone();
        next.set(key, value)?;
        if self.strict {
            validate(&next)?;
        }
        debug!(option = %key, "option changed, reinitializing");
        self.config = next;
        self.initialize(host)
    }

    /// Like [`ScrollSpy::set`], addressing the option by its external name.
    ///
    /// Unrecognized names are rejected with [`ConfigError::UnknownOption`].
    pub fn set_by_name<H>(
        &mut self,
        name: &str,
        value: OptionValue<E>,
        host: &mut H,
    ) -> Result<Update, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        let key = name.parse::<OptionKey>()?;
        self.set(key, value, host)
    }

    /// Re-run initialization with the current configuration.
    pub fn refresh<H>(&mut self, host: &mut H) -> Result<Update, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        self.initialize(host)
    }

    /// Unbind the scroll listener, remove the classes this instance applied, and stop
    /// processing events.
    pub fn detach<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E> + ?Sized,
    {
        self.clear_applied(host);
        if self.bound {
            host.unbind_scroll(self.listener);
            self.bound = false;
        }
        self.armed = false;
    }

    /// Handle one scroll event.
    pub fn on_scroll<H>(&mut self, host: &mut H) -> Update
    where
        H: Host<Element = E> + ?Sized,
    {
        if !self.armed {
            return Update::default();
        }
        if self.registry.is_empty() {
            // Content may have appeared since the last resolution.
            self.resolve_registry(host);
        }
        self.cycle(host)
    }

    fn initialize<H>(&mut self, host: &mut H) -> Result<Update, Error>
    where
        H: Host<Element = E> + ?Sized,
    {
        self.state.newly_initialized = true;
        self.clear_applied(host);
        let gate = match validate(&self.config) {
            Ok(gate) => gate,
            Err(err) if self.strict => {
                self.detach(host);
                return Err(err.into());
            }
            Err(err) => {
                warn!(%err, "scroll-spy disabled");
                self.detach(host);
                return Ok(Update::default());
            }
        };
        if !gate.allows(&host.pathname()) {
            debug!("location path not allowed, scroll-spy disabled");
            self.detach(host);
            return Ok(Update::default());
        }

        self.resolve_registry(host);
        let debug_line = self.config.flags().contains(Behavior::DEBUG_LINE);
        host.set_debug_line(debug_line.then(|| self.config.change_offset()));
        if self.bound {
            host.unbind_scroll(self.listener);
        }
        host.bind_scroll(self.listener);
        self.bound = true;
        self.armed = true;

        let mut update = self.cycle(host);
        self.state.newly_initialized = true;
        invoke(self.config.on_init(), &self.state, &mut update.callback_failures);
        self.state.newly_initialized = false;
        Ok(update)
    }

    fn resolve_registry<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E> + ?Sized,
    {
        self.registry = Registry::build(&*host, self.config.nav_links_selector());
        self.default_active = self
            .registry
            .default_active(&*host, self.config.default_active_element());
    }

    fn cycle<H>(&mut self, host: &mut H) -> Update
    where
        H: Host<Element = E> + ?Sized,
    {
        let line = trigger_line(host.viewport(), self.config.change_offset());
        let sections = self.registry.sections();
        let bounds: Vec<Option<Rect>> = sections.iter().map(|s| host.bounds_of(&s.element)).collect();
        let candidate = self
            .config
            .policy()
            .resolve(line, bounds.iter().copied())
            .map(|i| sections[i].clone());
        trace!(line, candidate = ?candidate.as_ref().map(|s| &s.id), "resolved");

        self.state.previous = core::mem::replace(&mut self.state.current, candidate);
        if !self.state.changed() && !self.state.newly_initialized {
            return Update::default();
        }

        let mut update = Update {
            pipeline_ran: true,
            callback_failures: Vec::new(),
        };
        self.run_pipeline(host, line, &bounds, &mut update.callback_failures);
        self.state.newly_initialized = false;
        update
    }

    fn run_pipeline<H>(
        &mut self,
        host: &mut H,
        line: f64,
        bounds: &[Option<Rect>],
        failures: &mut Vec<CallbackError>,
    ) where
        H: Host<Element = E> + ?Sized,
    {
        let flags = self.config.flags();
        debug!(
            current = ?self.state.current().map(|s| &s.id),
            previous = ?self.state.previous().map(|s| &s.id),
            "active section changed"
        );

        self.clear_applied(host);
        for link in self.registry.links() {
            self.set_link_highlight(host, &link.element, false, None);
        }
        if flags.contains(Behavior::SECTION_CLASSES) {
            for section in self.registry.sections() {
                host.remove_class(&section.element, self.config.section_active_class());
            }
        }

        let mut applied = Vec::new();
        match self.state.current() {
            None => {
                if flags.contains(Behavior::DEFAULT_LINK_ACTIVE)
                    && let Some(element) = &self.default_active
                {
                    self.set_link_highlight(host, element, true, Some(&mut applied));
                }
            }
            Some(section) => {
                if flags.contains(Behavior::SECTION_CLASSES) {
                    let class = self.config.section_active_class();
                    host.add_class(&section.element, class);
                    record(&mut applied, &section.element, class);
                }
                for link in self.registry.links_to(&section.id) {
                    self.set_link_highlight(host, &link.element, true, Some(&mut applied));
                }
            }
        }
        self.applied = applied;

        fragment_action(
            flags,
            self.state.current(),
            line,
            self.registry.sections(),
            bounds,
        )
        .apply(host);

        invoke(self.config.on_change(), &self.state, failures);
    }

    /// Remove every class recorded by the previous pipeline run.
    fn clear_applied<H>(&mut self, host: &mut H)
    where
        H: Host<Element = E> + ?Sized,
    {
        for (element, class) in core::mem::take(&mut self.applied) {
            host.remove_class(&element, &class);
        }
    }

    /// Toggle the link class on `element` and on its configured ancestors.
    ///
    /// Added classes are recorded in `applied` when given.
    fn set_link_highlight<H>(
        &self,
        host: &mut H,
        element: &E,
        on: bool,
        mut applied: Option<&mut Vec<(E, String)>>,
    ) where
        H: Host<Element = E> + ?Sized,
    {
        let class = self.config.nav_link_active_class();
        let mut apply = |host: &mut H, el: &E| {
            if on {
                host.add_class(el, class);
                if let Some(applied) = applied.as_deref_mut() {
                    record(applied, el, class);
                }
            } else {
                host.remove_class(el, class);
            }
        };
        if self.config.flags().contains(Behavior::UPDATE_LINK_CLASS) {
            apply(host, element);
        }
        for selector in self.config.parents_obtaining_active_class() {
            match host.closest(element, selector) {
                Ok(Some(parent)) => apply(host, &parent),
                Ok(None) => {}
                Err(err) => warn!(%err, "ancestor lookup failed"),
            }
        }
    }
}

/// Check the parts of a configuration that initialization depends on.
fn validate<E>(config: &Config<E>) -> Result<PathGate, ConfigError> {
    if config.nav_links_selector().trim().is_empty() {
        return Err(ConfigError::EmptySelector);
    }
    PathGate::new(config.allowed_paths())
}

fn record<E: PartialEq + Clone>(applied: &mut Vec<(E, String)>, element: &E, class: &str) {
    if !applied.iter().any(|(e, c)| e == element && c == class) {
        applied.push((element.clone(), class.to_string()));
    }
}

fn invoke<E>(
    callbacks: &[Callback<E>],
    state: &NavigationState<E>,
    failures: &mut Vec<CallbackError>,
) {
    for cb in callbacks {
        if let Err(err) = cb(state) {
            warn!(%err, "scroll-spy callback failed");
            failures.push(err);
        }
    }
}
