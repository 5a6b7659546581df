//! Event types for the TUI

use crossterm::event::KeyEvent;
use inventory_console::Result;
use inventory_console::model::{Resource, ResourceType};
use inventory_console::tree::{ExpandTicket, RootsTicket};
use inventory_console::types::TypesTicket;
use serde_json::{Map, Value};

/// Events that can occur in the TUI
#[derive(Debug)]
pub enum Event {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// A tick occurred (for UI refresh)
    Tick,
    /// A backend call finished
    Backend(BackendEvent),
}

/// Result of a backend call, posted back to the event loop
#[derive(Debug)]
pub enum BackendEvent {
    Roots {
        ticket: RootsTicket,
        result: Result<Vec<Resource>>,
    },
    Children {
        ticket: ExpandTicket,
        result: Result<Vec<Resource>>,
    },
    Types {
        ticket: TypesTicket,
        result: Result<Vec<ResourceType>>,
    },
    ResourceDeleted {
        resource: Resource,
        result: Result<()>,
    },
    TypeDeleted {
        type_id: String,
        result: Result<()>,
    },
    Status(Result<Map<String, Value>>),
}

/// Backend work requested by a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadRoots(RootsTicket),
    Expand(ExpandTicket),
    LoadTypes(TypesTicket),
    DeleteResource(Resource),
    DeleteType(String),
    CheckStatus,
}

/// State of the connection to the inventory service
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// No status check has completed yet
    Unknown,
    /// The service answered the status check
    Connected(String),
    /// The last status check failed
    Error(String),
}
