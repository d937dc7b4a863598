#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use {
    gatecfg_config::{
        Configuration, Credentials, DocumentFormat, Edit, EditError, ModelEntry, ModelScope,
        Provider, render,
    },
    gatecfg_sync::{
        BufferDisposition, CommitOutcome, EditState, Error, Notice, NoticeKind, SwitchOutcome,
        SyncController, SyncListener,
    },
    rstest::rstest,
};

#[derive(Default)]
struct Recorder {
    configs: Mutex<Vec<Arc<Configuration>>>,
    notices: Mutex<Vec<Notice>>,
}

impl SyncListener for Recorder {
    fn config_replaced(&self, config: &Arc<Configuration>) {
        self.configs.lock().unwrap().push(Arc::clone(config));
    }

    fn notice(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

fn controller_with_recorder(format: DocumentFormat) -> (SyncController, Arc<Recorder>) {
    let mut controller = SyncController::new(Configuration::new_session(), format).unwrap();
    let recorder = Arc::new(Recorder::default());
    controller.subscribe(recorder.clone());
    (controller, recorder)
}

fn openai() -> Provider {
    Provider::new("openai", "https://api.openai.com/v1/chat/completions")
        .with_credentials("sk-abc")
        .with_models([ModelEntry::name("gpt-4o")])
}

#[test]
fn malformed_text_is_reverted_on_commit() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    controller
        .replace_config(Configuration {
            providers: vec![openai()],
            ..Configuration::new_session()
        })
        .unwrap();
    let before_config = controller.config();
    let before_text = controller.text().to_owned();

    controller.edit_text("providers: [,,,");
    let outcome = controller.commit().unwrap();

    assert!(
        matches!(&outcome, CommitOutcome::Reverted(e) if e.is_syntax()),
        "{outcome:?}"
    );
    assert_eq!(*controller.config(), *before_config);
    assert_eq!(controller.text(), before_text);
    assert_eq!(controller.state(), EditState::Clean);

    let notices = recorder.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::ParseFailed);
    assert_eq!(notices[0].buffer, BufferDisposition::Reverted);
    // One broadcast for replace_config, none for the failed commit.
    assert_eq!(recorder.configs.lock().unwrap().len(), 1);
}

#[test]
fn valid_text_replaces_configuration_and_is_re_rendered() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    controller.edit_text(
        "providers:\n  - provider: openai\n    base_url: https://api.openai.com/v1/chat/completions\n    api: sk-abc\n    model: [gpt-4o]\n",
    );

    assert_eq!(controller.commit().unwrap(), CommitOutcome::Applied);

    let config = controller.config();
    assert_eq!(config.providers, vec![openai()]);
    // Sections missing from the text are empty, not carried over.
    assert_eq!(config.preferences, Default::default());
    assert_eq!(
        controller.text(),
        render(&config, DocumentFormat::Yaml).unwrap()
    );
    assert_eq!(recorder.configs.lock().unwrap().len(), 1);
    assert!(recorder.notices.lock().unwrap().is_empty());
}

#[test]
fn switch_format_carries_pending_edits() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    controller.edit_text("preferences:\n  cooldown_period: 60\n");

    assert_eq!(
        controller.switch_format(DocumentFormat::Json).unwrap(),
        SwitchOutcome::Switched
    );
    assert_eq!(controller.format(), DocumentFormat::Json);
    assert_eq!(controller.state(), EditState::Clean);
    assert_eq!(controller.config().preferences.cooldown_period, 60);
    assert_eq!(
        controller.text(),
        "{\n  \"providers\": [],\n  \"api_keys\": [],\n  \"preferences\": {\n    \
         \"cooldown_period\": 60\n  }\n}\n"
    );
    assert_eq!(recorder.configs.lock().unwrap().len(), 1);
}

#[test]
fn clean_switch_keeps_configuration_snapshot() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    let before = controller.config();

    assert_eq!(
        controller.switch_format(DocumentFormat::Json).unwrap(),
        SwitchOutcome::Switched
    );
    assert!(Arc::ptr_eq(&before, &controller.config()));
    assert!(recorder.configs.lock().unwrap().is_empty());
}

#[test]
fn switch_with_bad_text_is_rejected() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Json);
    controller.edit_text("{\"providers\": [");

    let outcome = controller.switch_format(DocumentFormat::Yaml).unwrap();

    assert!(matches!(outcome, SwitchOutcome::Rejected(_)), "{outcome:?}");
    assert_eq!(controller.format(), DocumentFormat::Json);
    assert_eq!(controller.text(), "{\"providers\": [");
    assert_eq!(controller.state(), EditState::Dirty);
    assert_eq!(*controller.config(), Configuration::new_session());

    let notices = recorder.notices.lock().unwrap();
    assert_eq!(notices[0].kind, NoticeKind::FormatSwitchRejected);
    assert_eq!(notices[0].buffer, BufferDisposition::Kept);
}

#[rstest]
#[case(DocumentFormat::Yaml)]
#[case(DocumentFormat::Json)]
fn switch_to_same_format_is_unchanged(#[case] format: DocumentFormat) {
    let (mut controller, _recorder) = controller_with_recorder(format);
    controller.edit_text("not parsed");
    assert_eq!(
        controller.switch_format(format).unwrap(),
        SwitchOutcome::Unchanged
    );
    assert_eq!(controller.state(), EditState::Dirty);
}

#[test]
fn structural_ambiguity_is_recovered() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    controller.edit_text(
        "providers:\n  - provider: openai\n    base_url: u\n    model:\n      - a: b\n        c: d\n",
    );

    let outcome = controller.commit().unwrap();

    assert!(
        matches!(&outcome, CommitOutcome::Reverted(e) if !e.is_syntax()),
        "{outcome:?}"
    );
    assert_eq!(*controller.config(), Configuration::new_session());
    assert_eq!(recorder.notices.lock().unwrap().len(), 1);
}

#[test]
fn form_edits_flow_through_apply() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    controller.apply(Edit::AddProvider).unwrap();
    controller
        .apply(Edit::SetCredential {
            provider: 0,
            slot: 0,
            value: "sk-a".into(),
        })
        .unwrap();
    controller
        .apply(Edit::AddModel {
            scope: ModelScope::Provider(0),
            model: "claude-3-5-sonnet".into(),
            alias: Some("claude35".into()),
        })
        .unwrap();

    let config = controller.config();
    assert_eq!(
        config.providers[0].api,
        Some(Credentials::Single("sk-a".into()))
    );
    assert!(
        controller.text().contains("- claude-3-5-sonnet: claude35"),
        "{}",
        controller.text()
    );
    assert_eq!(recorder.configs.lock().unwrap().len(), 3);
}

#[test]
fn failed_edit_leaves_state_alone() {
    let (mut controller, recorder) = controller_with_recorder(DocumentFormat::Yaml);
    let err = controller.apply(Edit::RemoveProvider(0)).unwrap_err();
    assert!(matches!(err, Error::Edit(EditError::OutOfRange { .. })), "{err}");
    assert_eq!(*controller.config(), Configuration::new_session());
    assert!(recorder.configs.lock().unwrap().is_empty());
}

#[test]
fn download_is_yaml_even_in_json_view() {
    let (mut controller, _recorder) = controller_with_recorder(DocumentFormat::Json);
    controller
        .replace_config(Configuration {
            providers: vec![openai()],
            ..Configuration::new_session()
        })
        .unwrap();

    let artifact = controller.download().unwrap();

    assert_eq!(artifact.file_name, "api.yaml");
    assert_eq!(artifact.mime_type, "text/yaml");
    assert_eq!(
        artifact.contents,
        render(&controller.config(), DocumentFormat::Yaml).unwrap()
    );
    assert!(controller.export().unwrap().starts_with('{'));
}
