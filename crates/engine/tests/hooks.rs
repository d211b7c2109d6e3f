//! End-to-end tests for the pre-commit and commit-msg hooks
//!
//! Each test builds a throw-away repository with git2, drops scripts into
//! `.quickhook/`, and captures the report in memory.

#![allow(clippy::unwrap_used, clippy::panic)]

use quickhook_config::EmptyFilesPolicy;
use quickhook_engine::hooks::HookCategory;
use quickhook_engine::{
    CommitMsg, FileSource, Git2Provider, HookOutcome, PreCommit, PreCommitOptions, Repo,
    Reporter, Timings,
};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestRepo {
    temp: TempDir,
    repo: git2::Repository,
}

impl TestRepo {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Quickhook Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        Self { temp, repo }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn hook(&self, category: HookCategory, name: &str, body: &str) -> PathBuf {
        let dir = self.root().join(".quickhook").join(category.dir_name());
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, body).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn stage(&self, name: &str, content: &str) {
        fs::write(self.root().join(name), content).unwrap();
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    fn stage_removal(&self, name: &str) {
        fs::remove_file(self.root().join(name)).unwrap();
        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    fn commit(&self) {
        let mut index = self.repo.index().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Quickhook Test", "test@example.com").unwrap();
        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "commit", &tree, &parents)
            .unwrap();
    }

    fn pre_commit(&self, options: PreCommitOptions) -> (HookOutcome, String) {
        let repo = Repo::discover(self.root()).unwrap();
        let pre_commit = PreCommit::new(repo, Box::new(Git2Provider::new()), options);
        let mut reporter = Reporter::new(Vec::new(), false);

        let outcome = pre_commit.run(&mut reporter, &Timings::disabled()).unwrap();
        let output = String::from_utf8(reporter.into_inner().unwrap()).unwrap();
        (outcome, output)
    }

    fn staged_pre_commit(&self) -> (HookOutcome, String) {
        self.pre_commit(PreCommitOptions::default())
    }
}

fn has_git() -> bool {
    which::which("git").is_ok()
}

#[test]
#[serial]
fn test_no_hooks_passes_silently() {
    let repo = TestRepo::new();
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert!(output.is_empty());
}

#[test]
#[serial]
fn test_passing_hook_stderr_is_shown() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommit,
        "passes",
        "#!/bin/sh\necho passed 1>&2\nexit 0\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(output, "passes: passed\n");
}

#[test]
#[serial]
fn test_failing_hook_stdout_is_prefixed() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommit,
        "fails",
        "#!/bin/sh\necho first line\necho second line\nexit 1\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Failed);
    assert_eq!(outcome.exit_code(), 65);
    assert_eq!(output, "fails: first line\nfails: second line\n");
}

#[test]
#[serial]
fn test_hooks_receive_staged_files_on_stdin() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "lists", "#!/bin/sh\ncat 1>&2\n");
    repo.stage("a.txt", "a");
    repo.stage("b.txt", "b");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "lists: a.txt\nlists: b.txt\n");
}

#[test]
#[serial]
fn test_staged_deletion_is_not_passed() {
    let repo = TestRepo::new();
    repo.stage("gone.txt", "bye");
    repo.commit();
    repo.stage_removal("gone.txt");
    repo.stage("kept.txt", "hi");
    repo.hook(HookCategory::PreCommit, "lists", "#!/bin/sh\ncat 1>&2\n");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "lists: kept.txt\n");
}

#[test]
#[serial]
fn test_nothing_staged_skips_hooks() {
    let repo = TestRepo::new();
    repo.stage("a.txt", "a");
    repo.commit();
    let marker = repo.root().join("ran");
    repo.hook(
        HookCategory::PreCommit,
        "touches",
        &format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
    );

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::NothingToCheck);
    assert_eq!(outcome.exit_code(), 66);
    assert_eq!(output, "No files to be committed!\n");
    assert!(!marker.exists());
}

#[test]
#[serial]
fn test_nothing_staged_with_succeed_policy() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "fails", "#!/bin/sh\nexit 1\n");

    let (outcome, output) = repo.pre_commit(PreCommitOptions {
        on_empty: EmptyFilesPolicy::Succeed,
        ..PreCommitOptions::default()
    });

    assert_eq!(outcome, HookOutcome::Passed);
    assert!(output.is_empty());
}

#[test]
#[serial]
fn test_nothing_staged_with_run_policy() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "runs", "#!/bin/sh\necho ran 1>&2\n");

    let (outcome, output) = repo.pre_commit(PreCommitOptions {
        on_empty: EmptyFilesPolicy::Run,
        ..PreCommitOptions::default()
    });

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "runs: ran\n");
}

#[test]
#[serial]
fn test_explicit_files_used_verbatim() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "lists", "#!/bin/sh\ncat 1>&2\n");

    let (outcome, output) = repo.pre_commit(PreCommitOptions {
        files: FileSource::Explicit(vec!["not/on/disk.rs".to_string()]),
        ..PreCommitOptions::default()
    });

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "lists: not/on/disk.rs\n");
}

#[test]
#[serial]
fn test_all_files_mode() {
    let repo = TestRepo::new();
    repo.stage("committed.txt", "c");
    repo.commit();
    repo.hook(HookCategory::PreCommit, "lists", "#!/bin/sh\ncat 1>&2\n");

    let (outcome, output) = repo.pre_commit(PreCommitOptions {
        files: FileSource::All,
        ..PreCommitOptions::default()
    });

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "lists: committed.txt\n");
}

#[test]
#[serial]
fn test_mutating_stops_at_first_failure() {
    let repo = TestRepo::new();
    let marker = repo.root().join("b-ran");
    let parallel_marker = repo.root().join("parallel-ran");
    repo.hook(
        HookCategory::PreCommitMutating,
        "a",
        "#!/bin/sh\necho cannot format\nexit 1\n",
    );
    repo.hook(
        HookCategory::PreCommitMutating,
        "b",
        &format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
    );
    repo.hook(
        HookCategory::PreCommit,
        "check",
        &format!("#!/bin/sh\ntouch '{}'\n", parallel_marker.display()),
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Failed);
    assert_eq!(output, "a: cannot format\n");
    assert!(!marker.exists());
    assert!(!parallel_marker.exists());
}

#[test]
#[serial]
fn test_parallel_hook_is_denied_git() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommit,
        "accesses-git",
        "#!/bin/sh\ngit status\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Failed);
    assert_eq!(
        output,
        "accesses-git: git is not allowed in parallel hooks (git status)\n"
    );
}

#[test]
#[serial]
fn test_mutating_hook_can_use_git() {
    if !has_git() {
        return;
    }

    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommitMutating,
        "uses-git",
        "#!/bin/sh\ngit diff --cached --name-only 1>&2\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "uses-git: a.txt\n");
}

#[test]
#[serial]
fn test_shim_is_removed_after_run() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommit,
        "where",
        "#!/bin/sh\ncommand -v git 1>&2\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    let shim = output.trim().strip_prefix("where: ").unwrap();
    assert!(shim.contains("quickhook-git-shim-"));
    assert!(!Path::new(shim).exists());
}

#[test]
#[serial]
fn test_shim_is_removed_when_mutating_hook_fails() {
    let tmp = TempDir::new().unwrap();
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommitMutating,
        "fails",
        "#!/bin/sh\necho broken\nexit 1\n",
    );
    repo.hook(HookCategory::PreCommit, "never-runs", "#!/bin/sh\nexit 0\n");
    repo.stage("a.txt", "a");

    let (outcome, _) = temp_env::with_var("TMPDIR", Some(tmp.path()), || {
        repo.staged_pre_commit()
    });

    assert_eq!(outcome, HookOutcome::Failed);
    let leftovers: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("quickhook-git-shim-")
        })
        .collect();
    assert!(leftovers.is_empty(), "shim left behind: {leftovers:?}");
}

#[test]
#[serial]
fn test_mutating_hook_is_not_behind_shim() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommitMutating,
        "where",
        "#!/bin/sh\ncommand -v git 1>&2\nexit 0\n",
    );
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert!(!output.contains("quickhook-git-shim-"), "{output}");
}

#[test]
#[serial]
fn test_parallel_results_in_discovery_order() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::PreCommit,
        "a-slow",
        "#!/bin/sh\nsleep 0.3\necho slow 1>&2\n",
    );
    repo.hook(HookCategory::PreCommit, "b-fast", "#!/bin/sh\necho fast 1>&2\n");
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.pre_commit(PreCommitOptions {
        parallelism: 2,
        ..PreCommitOptions::default()
    });

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(output, "a-slow: slow\nb-fast: fast\n");
}

#[test]
#[serial]
fn test_parallel_failures_do_not_stop_others() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "a-fails", "#!/bin/sh\necho bad\nexit 2\n");
    repo.hook(HookCategory::PreCommit, "b-passes", "#!/bin/sh\necho ok 1>&2\n");
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Failed);
    assert_eq!(output, "a-fails: bad\nb-passes: ok\n");
}

#[test]
#[serial]
fn test_runs_are_idempotent() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "lists", "#!/bin/sh\ncat 1>&2\n");
    repo.hook(HookCategory::PreCommit, "fails", "#!/bin/sh\necho no\nexit 1\n");
    repo.stage("a.txt", "a");

    let first = repo.staged_pre_commit();
    let second = repo.staged_pre_commit();

    assert_eq!(first, second);
}

#[test]
#[serial]
fn test_non_executable_hook_is_skipped() {
    let repo = TestRepo::new();
    let dir = repo.root().join(".quickhook/pre-commit");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("README"), "not a hook").unwrap();
    repo.stage("a.txt", "a");

    let (outcome, output) = repo.staged_pre_commit();

    assert_eq!(outcome, HookOutcome::Passed);
    assert!(output.is_empty());
}

#[test]
#[serial]
fn test_trace_records_spans() {
    let repo = TestRepo::new();
    repo.hook(HookCategory::PreCommit, "ok", "#!/bin/sh\n");
    repo.stage("a.txt", "a");

    let pre_commit = PreCommit::new(
        Repo::discover(repo.root()).unwrap(),
        Box::new(Git2Provider::new()),
        PreCommitOptions::default(),
    );
    let timings = Timings::enabled();
    pre_commit
        .run(&mut Reporter::new(Vec::new(), false), &timings)
        .unwrap();

    let names: Vec<String> = timings.spans().into_iter().map(|s| s.name).collect();
    for expected in [
        "find pre-commit-mutating",
        "find pre-commit",
        "git diff",
        "hook pre-commit ok",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}

#[test]
#[serial]
fn test_commit_msg_hook_edits_message() {
    let repo = TestRepo::new();
    repo.hook(
        HookCategory::CommitMsg,
        "sign",
        "#!/bin/sh\necho 'Signed-off-by: Quickhook Test' >> \"$1\"\n",
    );
    let message = repo.root().join(".git/COMMIT_EDITMSG");
    fs::write(&message, "Add feature\n").unwrap();

    let commit_msg = CommitMsg::new(Repo::discover(repo.root()).unwrap());
    let mut reporter = Reporter::new(Vec::new(), false);
    let outcome = commit_msg
        .run(&message, &mut reporter, &Timings::disabled())
        .unwrap();

    assert_eq!(outcome, HookOutcome::Passed);
    assert_eq!(
        fs::read_to_string(&message).unwrap(),
        "Add feature\nSigned-off-by: Quickhook Test\n"
    );
}

#[test]
#[serial]
fn test_commit_msg_failure_stops_sequence() {
    let repo = TestRepo::new();
    let marker = repo.root().join("second-ran");
    repo.hook(
        HookCategory::CommitMsg,
        "a-rejects",
        "#!/bin/sh\necho 'message too short' 1>&2\nexit 1\n",
    );
    repo.hook(
        HookCategory::CommitMsg,
        "b-never",
        &format!("#!/bin/sh\ntouch '{}'\n", marker.display()),
    );
    let message = repo.root().join(".git/COMMIT_EDITMSG");
    fs::write(&message, "x\n").unwrap();

    let commit_msg = CommitMsg::new(Repo::discover(repo.root()).unwrap());
    let mut reporter = Reporter::new(Vec::new(), false);
    let outcome = commit_msg
        .run(&message, &mut reporter, &Timings::disabled())
        .unwrap();
    let output = String::from_utf8(reporter.into_inner().unwrap()).unwrap();

    assert_eq!(outcome, HookOutcome::Failed);
    assert_eq!(output, "a-rejects: message too short\n");
    assert!(!marker.exists());
}
