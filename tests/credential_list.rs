mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{activate, as_service, two_credentials};
use unlock_kit::credential::Credential;
use unlock_kit::service::{AccessService, MockAccessService, ServiceError, ServiceSlot};
use unlock_kit::ui::credentials::CredentialListModel;

fn ids(credentials: Vec<&Credential>) -> Vec<&str> {
    credentials.into_iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn empty_search_lists_everything_in_service_order() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let model = CredentialListModel::new(as_service(&mock));

    assert_eq!(model.search_text(), "");
    assert_eq!(ids(model.filtered_credentials()), ["a", "b"]);
    assert_eq!(model.credentials().len(), 2);
}

#[tokio::test]
async fn search_matches_names_case_insensitively() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut model = CredentialListModel::new(as_service(&mock));

    model.set_search_text("BIKE");
    assert_eq!(ids(model.filtered_credentials()), ["b"]);

    model.set_search_text("o");
    assert_eq!(ids(model.filtered_credentials()), ["a", "b"]);

    model.set_search_text("sauna");
    assert!(model.filtered_credentials().is_empty());
}

#[tokio::test]
async fn select_sets_and_clears() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut model = CredentialListModel::new(as_service(&mock));

    let b = model.credentials()[1].clone();
    model.select(Some(&b));
    assert_eq!(model.selected_credential_id(), Some("b"));
    assert_eq!(model.selected_credential().map(|c| c.name.as_str()), Some("Bike Room"));

    model.select(None);
    assert_eq!(model.selected_credential_id(), None);
}

#[tokio::test]
async fn on_appear_activates_and_selects_single_credential() {
    let mock = MockAccessService::new(vec![Credential::new("only", "Front Door", "seos")]);
    mock.initialize("test-token").unwrap();
    let mock = Arc::new(mock);
    let mut model = CredentialListModel::new(as_service(&mock));
    assert!(!model.is_activated());

    model.on_appear().await;

    assert!(model.is_activated());
    assert_eq!(model.selected_credential_id(), Some("only"));
    assert!(model.last_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn on_appear_waits_for_slow_activation() {
    let mock = MockAccessService::new(vec![Credential::new("only", "Front Door", "seos")])
        .with_activation_delay(Duration::from_millis(200));
    mock.initialize("test-token").unwrap();
    let mock = Arc::new(mock);
    let mut model = CredentialListModel::new(as_service(&mock));

    model.on_appear().await;

    assert_eq!(model.selected_credential_id(), Some("only"));
}

#[tokio::test]
async fn on_appear_leaves_real_choices_to_the_user() {
    let mock = MockAccessService::new(two_credentials());
    mock.initialize("test-token").unwrap();
    let mut model = CredentialListModel::new(as_service(&Arc::new(mock)));

    model.on_appear().await;

    assert!(model.is_activated());
    assert_eq!(model.selected_credential_id(), None);
}

#[tokio::test]
async fn auto_select_can_be_disabled() {
    let mock = MockAccessService::new(vec![Credential::new("only", "Front Door", "seos")]);
    mock.initialize("test-token").unwrap();
    let mut model =
        CredentialListModel::new(as_service(&Arc::new(mock))).with_auto_select_single(false);

    model.on_appear().await;

    assert_eq!(model.selected_credential_id(), None);
}

#[tokio::test]
async fn on_appear_is_idempotent() {
    let mock = activate(MockAccessService::new(vec![Credential::new("only", "Door", "seos")])).await;
    let mut model = CredentialListModel::new(as_service(&mock));

    model.on_appear().await;
    model.on_appear().await;

    assert!(model.is_activated());
    assert_eq!(model.selected_credential_id(), Some("only"));
}

#[tokio::test]
async fn activation_failure_is_recorded_not_raised() {
    let mock = MockAccessService::new(two_credentials()).with_activation_failure("backend offline");
    mock.initialize("test-token").unwrap();
    let mut model = CredentialListModel::new(as_service(&Arc::new(mock)));

    model.on_appear().await;

    assert!(!model.is_activated());
    assert_eq!(
        model.last_error(),
        Some(&ServiceError::Sdk {
            reason: "backend offline".into()
        })
    );

    model.clear_error();
    assert!(model.last_error().is_none());
}

#[tokio::test]
async fn on_appear_without_initialize_records_error() {
    let mock = Arc::new(MockAccessService::new(two_credentials()));
    let mut model = CredentialListModel::new(as_service(&mock));

    model.on_appear().await;

    assert_eq!(model.last_error(), Some(&ServiceError::InitializationRequired));
    assert!(model.credentials().is_empty());
}

#[tokio::test]
async fn refresh_pulls_new_snapshot() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut model = CredentialListModel::new(as_service(&mock));

    mock.set_credentials(vec![Credential::new("c", "Cellar", "seos")]);
    model.refresh_credentials().await;

    assert_eq!(ids(model.filtered_credentials()), ["c"]);
}

#[tokio::test]
async fn refresh_failure_is_swallowed() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut model = CredentialListModel::new(as_service(&mock));

    mock.begin_deactivation();
    model.refresh_credentials().await;

    assert_eq!(model.last_error(), Some(&ServiceError::DeactivationInProgress));
    assert_eq!(model.credentials().len(), 2);
}

#[tokio::test]
async fn changed_follows_deactivation() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut model = CredentialListModel::new(as_service(&mock));
    assert!(model.is_activated());

    mock.deactivate(false);
    assert!(model.changed().await);

    assert!(!model.is_activated());
    assert!(model.credentials().is_empty());
}

#[tokio::test]
async fn each_model_keeps_its_own_copy() {
    let mock = activate(MockAccessService::new(two_credentials())).await;
    let mut first = CredentialListModel::new(as_service(&mock));
    let second = CredentialListModel::new(as_service(&mock));

    mock.set_credentials(vec![Credential::new("c", "Cellar", "seos")]);
    first.sync();

    assert_eq!(first.credentials().len(), 1);
    assert_eq!(second.credentials().len(), 2);
}

#[tokio::test]
async fn rebind_follows_service_slot() {
    let first = activate(MockAccessService::new(two_credentials())).await;
    let second = activate(MockAccessService::new(vec![Credential::new("z", "Zen Garden", "latch")])).await;
    let slot = ServiceSlot::new(as_service(&first));
    let mut model = CredentialListModel::new(slot.current());
    let a = model.credentials()[0].clone();
    model.select(Some(&a));

    let mut swaps = slot.subscribe();
    slot.replace(as_service(&second));
    swaps.changed().await.unwrap();
    model.rebind(swaps.borrow_and_update().clone());

    assert_eq!(ids(model.filtered_credentials()), ["z"]);
    assert_eq!(model.selected_credential_id(), None);
    assert_eq!(model.service().name(), "mock");

    let log = slot.swap_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].old_service, "mock");
    assert_eq!(log[0].new_service, "mock");
}
