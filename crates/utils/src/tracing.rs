// Copyright 2023 Irreducible Inc.

use crate::env::boolean_env_flag_set;

/// Install a global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Setting `MASKGEN_TRACE_SPANS` also logs
/// every closed span together with its busy and idle times. Calling this more than once is
/// harmless; only the first subscriber is kept.
pub fn init_tracing() {
	use tracing_subscriber::{
		fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
	};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let span_events = if boolean_env_flag_set("MASKGEN_TRACE_SPANS") {
		FmtSpan::CLOSE
	} else {
		FmtSpan::NONE
	};

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_span_events(span_events))
		.try_init();
}
