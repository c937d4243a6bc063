//! Forced dispatch: every force mode yields byte-identical output.
//!
//! Forcing mutates process-global dispatch cells, so everything runs in one
//! test in this binary.

use strings::{DispatchInfo, Force, config, kernels};
use tracing_subscriber::util::SubscriberInitExt;

const SCENARIO: &[u8] = b"Hello, World! 42";

fn lowercase_copy(input: &[u8]) -> Vec<u8> {
  let mut buf = input.to_vec();
  strings::lowercase_in_place(&mut buf);
  buf
}

#[test]
fn forced_modes_produce_identical_output() {
  let _guard = tracing_subscriber::fmt()
    .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
    .with_test_writer()
    .set_default();

  let long = SCENARIO.repeat(37);
  let expected_long = long.to_ascii_lowercase();

  for mode in Force::ALL {
    strings::force(mode);
    let features = config::selection_features() & mode.features();

    let info = DispatchInfo::current();
    info.log();
    assert_eq!(info.lowercase, kernels::LOWERCASE.select(features).name, "force={mode}");
    assert_eq!(info.replace, kernels::REPLACE.select(features).name, "force={mode}");
    assert_eq!(info.find, kernels::FIND.select(features).name, "force={mode}");

    let cfg = config::get();
    assert_eq!(cfg.requested_force, mode);
    assert_eq!(cfg.effective_force, mode.clamp_to(config::selection_features()));

    assert_eq!(lowercase_copy(SCENARIO), b"hello, world! 42", "force={mode}");
    assert_eq!(lowercase_copy(&long), expected_long, "force={mode}");

    let mut buf = b"a_b_c_d".repeat(9);
    strings::replace_in_place(&mut buf, b'_', b'-');
    assert_eq!(strings::find(&buf, b'_'), None, "force={mode}");
    assert_eq!(strings::common_prefix(&buf, &b"a-b-c-d".repeat(9)), buf.len(), "force={mode}");
  }

  strings::force(Force::Scalar);
  for (primitive, variant) in DispatchInfo::current().variants() {
    assert_eq!(variant, "scalar", "{primitive} not scalar under Force::Scalar");
  }

  strings::force(Force::Auto);
  let auto = config::selection_features();
  assert_eq!(strings::lowercase_backend_name(), kernels::LOWERCASE.select(auto).name);
}
