// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-end hook.

use crate::{EndInput, HookError};
use troupe_core::{short_session_id, SessionStatus};
use troupe_store::{sessions, StateRoot};

pub fn run(root: &StateRoot, input: &EndInput) -> Result<(), HookError> {
    let short_id = short_session_id(&input.session_id)?.to_string();
    sessions::mark_status(root, &short_id, SessionStatus::Closed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use troupe_core::SessionRecord;
    use troupe_store::sessions::with_session;

    #[test]
    fn end_closes_the_record() {
        let tmp = tempfile::tempdir().unwrap();
        let root = StateRoot::open(tmp.path()).unwrap();
        with_session(&root, "a1b2c3d4", |_| {
            Ok((Some(SessionRecord::new("a1b2c3d4", "/tmp", 1)), ()))
        })
        .unwrap();

        run(
            &root,
            &EndInput {
                session_id: "a1b2c3d4e5f6".into(),
            },
        )
        .unwrap();

        let record = sessions::load(&root, "a1b2c3d4").unwrap().unwrap();
        assert_eq!(record.status, SessionStatus::Closed);
    }

    #[test]
    fn end_rejects_unsafe_id() {
        let tmp = tempfile::tempdir().unwrap();
        let root = StateRoot::open(tmp.path()).unwrap();
        let err = run(
            &root,
            &EndInput {
                session_id: "../../bad".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid session_id");
    }

    #[test]
    fn end_on_unknown_session_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let root = StateRoot::open(tmp.path()).unwrap();
        run(
            &root,
            &EndInput {
                session_id: "a1b2c3d4".into(),
            },
        )
        .unwrap();
        assert!(sessions::load(&root, "a1b2c3d4").unwrap().is_none());
    }
}
