//! dnstoys Application Layer: ports, query grammars and service handlers.
pub mod ports;
pub mod services;
pub mod use_cases;
