//! End-to-end CLI test suite.

mod common;

use common::harness::TestEnv;
use predicates::prelude::*;

// ===========================================
// scan command tests
// ===========================================
mod scan_tests {
    use super::*;

    #[test]
    fn test_scan_reports_counts() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_record("2024-01-15T10:00:00Z Note.meta.json", "Note", &[], &[]);

        env.cmd()
            .arg("scan")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 records and 1 journals"));
    }

    #[test]
    fn test_scan_surfaces_malformed_files_without_failing() {
        let env = TestEnv::new();
        env.add_record("2024-01-15T10:00:00Z Good.meta.json", "Good", &[], &[]);
        std::fs::write(env.root().join("Bad.meta.json"), "not json").unwrap();

        env.cmd()
            .arg("scan")
            .assert()
            .success()
            .stderr(predicate::str::contains("skipped"))
            .stderr(predicate::str::contains("Bad.meta.json"));
    }
}

// ===========================================
// ls command tests
// ===========================================
mod ls_tests {
    use super::*;

    #[test]
    fn test_ls_shows_temporal_tree() {
        let env = TestEnv::new();
        env.add_record("2024-01-15T10:00:00Z A.meta.json", "A", &[], &[]);
        env.add_record("2024-01-15T11:00:00Z B.meta.json", "B", &[], &[]);
        env.add_record("2023-12-31T23:00:00Z C.meta.json", "C", &[], &[]);

        env.cmd()
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("2024"))
            .stdout(predicate::str::contains("2023"))
            .stdout(predicate::str::contains("15  (2)"));
    }

    #[test]
    fn test_ls_day_bucket_lists_entries_newest_first() {
        let env = TestEnv::new();
        env.add_record("2024-01-15T10:00:00Z Early.meta.json", "Early", &[], &[]);
        env.add_record("2024-01-15T18:00:00Z Late.meta.json", "Late", &[], &[]);
        env.add_record("2024-01-16T09:00:00Z NextDay.meta.json", "NextDay", &[], &[]);

        let output = env
            .cmd()
            .args(["ls", "--year", "2024", "--month", "1", "--day", "15"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Late"))
            .stdout(predicate::str::contains("Early"))
            .stdout(predicate::str::contains("NextDay").not());
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
        assert!(stdout.find("Late").unwrap() < stdout.find("Early").unwrap());
    }

    #[test]
    fn test_ls_off_hides_tagged_entries_but_not_untagged() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_record(
            "2024-01-15T10:00:00Z Tagged.meta.json",
            "Tagged",
            &["Work.journal.json"],
            &[],
        );
        env.add_record("2024-01-15T11:00:00Z Plain.meta.json", "Plain", &[], &[]);

        env.cmd()
            .args(["ls", "--year", "2024", "--off", "Work.journal.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Plain"))
            .stdout(predicate::str::contains("Tagged").not());
    }

    #[test]
    fn test_ls_empty_collection() {
        let env = TestEnv::new();
        env.cmd()
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("No entries"));
    }
}

// ===========================================
// journal command tests
// ===========================================
mod journal_tests {
    use super::*;

    #[test]
    fn test_journal_add_sanitizes_name_into_key() {
        let env = TestEnv::new();

        env.cmd()
            .args(["journal-add", "Field Notes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("FieldNotes.journal.json"));

        assert!(env.file_exists("FieldNotes.journal.json"));

        env.cmd()
            .arg("journals")
            .assert()
            .success()
            .stdout(predicate::str::contains("Field Notes"));
    }

    #[test]
    fn test_journal_add_rejects_colliding_key() {
        let env = TestEnv::new();
        env.cmd().args(["journal-add", "Field Notes"]).assert().success();

        env.cmd()
            .args(["journal-add", "Field-Notes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_journal_rm_leaves_tagged_records_in_place() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_record(
            "2024-01-15T10:00:00Z Note.meta.json",
            "Note",
            &["Work.journal.json"],
            &[],
        );

        env.cmd()
            .args(["journal-rm", "Work.journal.json"])
            .assert()
            .success();

        assert!(!env.file_exists("Work.journal.json"));
        assert!(env.file_exists("2024-01-15T10:00:00Z Note.meta.json"));

        // The dangling tag falls under default-open visibility.
        env.cmd()
            .args(["ls", "--year", "2024"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Note"));
    }

    #[test]
    fn test_journal_rm_unknown_key_fails() {
        let env = TestEnv::new();
        env.cmd()
            .args(["journal-rm", "Missing.journal.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown journal"));
    }
}

// ===========================================
// import command tests
// ===========================================
mod import_tests {
    use super::*;

    #[test]
    fn test_import_creates_record_and_payload() {
        let env = TestEnv::new();
        let source = env.audio_fixture("walk.ogg", b"opus bytes");

        env.cmd()
            .arg("import")
            .arg(&source)
            .args(["--name", "Morning Walk"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"))
            .stdout(predicate::str::contains("MorningWalk.meta.json"));

        env.cmd()
            .arg("ls")
            .assert()
            .success()
            .stdout(predicate::str::contains("(1)"));
    }

    #[test]
    fn test_import_tags_named_journals_only() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_journal("Home", "Home");
        let source = env.audio_fixture("standup.ogg", b"x");

        env.cmd()
            .arg("import")
            .arg(&source)
            .args(["--name", "Standup", "--journal", "Work.journal.json"])
            .assert()
            .success();

        // Muting Work hides the import; Home stays irrelevant to it.
        let year = chrono::Utc::now().format("%Y").to_string();
        env.cmd()
            .args(["ls", "--year", &year, "--off", "Work.journal.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Standup").not());
    }

    #[test]
    fn test_import_unknown_journal_fails() {
        let env = TestEnv::new();
        let source = env.audio_fixture("x.ogg", b"x");

        env.cmd()
            .arg("import")
            .arg(&source)
            .args(["--journal", "Missing.journal.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown journal"));
    }
}

// ===========================================
// rm / retag command tests
// ===========================================
mod record_tests {
    use super::*;

    #[test]
    fn test_rm_removes_metadata_and_payloads() {
        let env = TestEnv::new();
        std::fs::write(env.root().join("clip.ogg"), b"x").unwrap();
        env.add_record(
            "2024-01-15T10:00:00Z Note.meta.json",
            "Note",
            &[],
            &["clip.ogg"],
        );

        env.cmd()
            .args(["rm", "2024-01-15T10:00:00Z Note.meta.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed"));

        assert!(!env.file_exists("2024-01-15T10:00:00Z Note.meta.json"));
        assert!(!env.file_exists("clip.ogg"));
    }

    #[test]
    fn test_rm_unknown_record_fails() {
        let env = TestEnv::new();
        env.cmd()
            .args(["rm", "2024-01-15T10:00:00Z Missing.meta.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown record"));
    }

    #[test]
    fn test_retag_overwrites_tag_set() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_journal("Home", "Home");
        env.add_record(
            "2024-01-15T10:00:00Z Note.meta.json",
            "Note",
            &["Work.journal.json"],
            &[],
        );

        env.cmd()
            .args([
                "retag",
                "2024-01-15T10:00:00Z Note.meta.json",
                "Home.journal.json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Home.journal.json"));

        let body =
            std::fs::read_to_string(env.root().join("2024-01-15T10:00:00Z Note.meta.json"))
                .unwrap();
        assert!(body.contains("Home.journal.json"));
        assert!(!body.contains("Work.journal.json"));
    }

    #[test]
    fn test_retag_with_no_journals_clears_tags() {
        let env = TestEnv::new();
        env.add_journal("Work", "Work");
        env.add_record(
            "2024-01-15T10:00:00Z Note.meta.json",
            "Note",
            &["Work.journal.json"],
            &[],
        );

        env.cmd()
            .args(["retag", "2024-01-15T10:00:00Z Note.meta.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared tags"));
    }
}
