//! Commands the shortcut layer can dispatch, and the routes it navigates to.

use std::fmt;

/// A dashboard page reachable through a `G <key>` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Find,
    Pipeline,
    Business,
    Calendar,
}

impl Route {
    /// Router path for this page.
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/dashboard",
            Route::Find => "/find",
            Route::Pipeline => "/pipeline",
            Route::Business => "/business",
            Route::Calendar => "/calendar",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A named action resolved from one or more key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCommand {
    OpenSearch,
    OpenNew,
    OpenToolkit,
    NavigateHome,
    NavigateFind,
    NavigatePipeline,
    NavigateBusiness,
    NavigateCalendar,
    ShowHelp,
    DismissHelp,
}

impl ShortcutCommand {
    /// Every command, in help-table order.
    pub const ALL: [ShortcutCommand; 10] = [
        ShortcutCommand::OpenSearch,
        ShortcutCommand::OpenNew,
        ShortcutCommand::OpenToolkit,
        ShortcutCommand::NavigateHome,
        ShortcutCommand::NavigateFind,
        ShortcutCommand::NavigatePipeline,
        ShortcutCommand::NavigateBusiness,
        ShortcutCommand::NavigateCalendar,
        ShortcutCommand::ShowHelp,
        ShortcutCommand::DismissHelp,
    ];

    /// Resolve a config action name. Help commands are built in and cannot be bound.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "open_search" => Some(ShortcutCommand::OpenSearch),
            "open_new" => Some(ShortcutCommand::OpenNew),
            "open_toolkit" => Some(ShortcutCommand::OpenToolkit),
            "navigate_home" => Some(ShortcutCommand::NavigateHome),
            "navigate_find" => Some(ShortcutCommand::NavigateFind),
            "navigate_pipeline" => Some(ShortcutCommand::NavigatePipeline),
            "navigate_business" => Some(ShortcutCommand::NavigateBusiness),
            "navigate_calendar" => Some(ShortcutCommand::NavigateCalendar),
            _ => None,
        }
    }

    pub fn action_name(self) -> &'static str {
        match self {
            ShortcutCommand::OpenSearch => "open_search",
            ShortcutCommand::OpenNew => "open_new",
            ShortcutCommand::OpenToolkit => "open_toolkit",
            ShortcutCommand::NavigateHome => "navigate_home",
            ShortcutCommand::NavigateFind => "navigate_find",
            ShortcutCommand::NavigatePipeline => "navigate_pipeline",
            ShortcutCommand::NavigateBusiness => "navigate_business",
            ShortcutCommand::NavigateCalendar => "navigate_calendar",
            ShortcutCommand::ShowHelp => "show_help",
            ShortcutCommand::DismissHelp => "dismiss_help",
        }
    }

    /// Human-readable description for the help overlay.
    pub fn description(self) -> &'static str {
        match self {
            ShortcutCommand::OpenSearch => "Open search",
            ShortcutCommand::OpenNew => "Create new",
            ShortcutCommand::OpenToolkit => "Open toolkit",
            ShortcutCommand::NavigateHome => "Go to dashboard",
            ShortcutCommand::NavigateFind => "Go to find opportunities",
            ShortcutCommand::NavigatePipeline => "Go to pipeline",
            ShortcutCommand::NavigateBusiness => "Go to business",
            ShortcutCommand::NavigateCalendar => "Go to calendar",
            ShortcutCommand::ShowHelp => "Show keyboard shortcuts",
            ShortcutCommand::DismissHelp => "Close dialog",
        }
    }

    /// Navigation target, for the `Navigate*` commands.
    pub fn route(self) -> Option<Route> {
        match self {
            ShortcutCommand::NavigateHome => Some(Route::Home),
            ShortcutCommand::NavigateFind => Some(Route::Find),
            ShortcutCommand::NavigatePipeline => Some(Route::Pipeline),
            ShortcutCommand::NavigateBusiness => Some(Route::Business),
            ShortcutCommand::NavigateCalendar => Some(Route::Calendar),
            _ => None,
        }
    }
}

impl fmt::Display for ShortcutCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}
