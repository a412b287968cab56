use std::{rc::Rc, time::Duration};

use serde_json::Value;

use crate::{
    api::{ApiClient, Endpoint, Method, Transport},
    error::{ApiError, PayloadError},
    model::{
        AnimeId, FieldSource, ListMutation, RelationId, ReviewId, ReviewSubmission, StatusUpdate,
        WatchStatus,
    },
    notify::Notifier,
};

pub const DEFAULT_CONFIRMATION: &str = "Вы уверены?";

/// Question to ask before acting on a control with `data-confirm`. An empty
/// attribute asks the generic question.
pub fn confirmation(fields: &impl FieldSource) -> Option<String> {
    let message = fields.field("confirm")?;
    match message.trim() {
        "" => Some(DEFAULT_CONFIRMATION.to_string()),
        message => Some(message.to_string()),
    }
}

/// Browser side effects a finished action may trigger.
pub trait Page {
    fn schedule_reload(&self, delay: Duration);
}

/// One user gesture, validated and ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddToList {
        mutation: ListMutation,
        label: Option<String>,
    },
    ChangeStatus {
        relation_id: RelationId,
        update: StatusUpdate,
    },
    RemoveEntry(RelationId),
    RemoveFromList(AnimeId),
    ToggleFavorite(AnimeId),
    SubmitReview(ReviewSubmission),
    MarkHelpful(ReviewId),
    MarkUnhelpful(ReviewId),
}

impl Action {
    pub fn add_to_list(fields: &impl FieldSource) -> Result<Self, PayloadError> {
        Ok(Action::AddToList {
            mutation: ListMutation::from_fields(fields)?,
            label: fields
                .field("label")
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty()),
        })
    }

    /// `selected` is the status picked in the control, the relation id comes
    /// from its attributes.
    pub fn change_status(fields: &impl FieldSource, selected: &str) -> Result<Self, PayloadError> {
        let relation_id = RelationId::from_fields(fields)?;
        if selected.trim().is_empty() {
            return Err(PayloadError::MissingField("status"));
        }
        let status = selected.parse::<WatchStatus>()?;

        Ok(Action::ChangeStatus {
            relation_id,
            update: StatusUpdate { status },
        })
    }

    /// Entries rendered from a user's list carry their relation id, anime
    /// pages only know the anime.
    pub fn remove_from_list(fields: &impl FieldSource) -> Result<Self, PayloadError> {
        match fields.field(RelationId::FIELD) {
            Some(raw) if !raw.trim().is_empty() => Ok(Action::RemoveEntry(RelationId::parse(&raw)?)),
            _ => Ok(Action::RemoveFromList(AnimeId::from_fields(fields)?)),
        }
    }

    pub fn toggle_favorite(fields: &impl FieldSource) -> Result<Self, PayloadError> {
        Ok(Action::ToggleFavorite(AnimeId::from_fields(fields)?))
    }

    pub fn submit_review(
        form_attributes: &impl FieldSource,
        form: &impl FieldSource,
    ) -> Result<Self, PayloadError> {
        Ok(Action::SubmitReview(ReviewSubmission::from_form(
            form_attributes,
            form,
        )?))
    }

    pub fn mark_helpful(fields: &impl FieldSource) -> Result<Self, PayloadError> {
        Ok(Action::MarkHelpful(ReviewId::from_fields(fields)?))
    }

    pub fn mark_unhelpful(fields: &impl FieldSource) -> Result<Self, PayloadError> {
        Ok(Action::MarkUnhelpful(ReviewId::from_fields(fields)?))
    }

    pub fn method(&self) -> Method {
        match self {
            Action::ChangeStatus { .. } => Method::Put,
            Action::RemoveEntry(_) | Action::RemoveFromList(_) => Method::Delete,
            _ => Method::Post,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::AddToList { .. } => Endpoint::Lists,
            Action::ChangeStatus { relation_id, .. } => Endpoint::ListEntry(relation_id.clone()),
            Action::RemoveEntry(id) => Endpoint::ListEntry(id.clone()),
            Action::RemoveFromList(id) => Endpoint::ListEntryByAnime(id.clone()),
            Action::ToggleFavorite(id) => Endpoint::Favorite(id.clone()),
            Action::SubmitReview(_) => Endpoint::Reviews,
            Action::MarkHelpful(id) => Endpoint::Helpful(id.clone()),
            Action::MarkUnhelpful(id) => Endpoint::Unhelpful(id.clone()),
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            Action::AddToList { mutation, label } => format!(
                "Добавлено: {}",
                label
                    .as_deref()
                    .unwrap_or_else(|| mutation.status.display_name())
            ),
            Action::ChangeStatus { .. } => "Статус обновлен!".to_string(),
            Action::RemoveEntry(_) | Action::RemoveFromList(_) => "Удалено из списка".to_string(),
            Action::ToggleFavorite(_) => "Избранное обновлено".to_string(),
            Action::SubmitReview(_) => "Отзыв отправлен".to_string(),
            Action::MarkHelpful(_) | Action::MarkUnhelpful(_) => "Спасибо за оценку".to_string(),
        }
    }

    async fn send<T: Transport>(&self, client: &ApiClient<T>) -> Result<Option<Value>, ApiError> {
        let path = self.endpoint().path();
        match self {
            Action::AddToList { mutation, .. } => client.post(&path, Some(mutation)).await,
            Action::ChangeStatus { update, .. } => client.put(&path, update).await,
            Action::SubmitReview(review) => client.post(&path, Some(review)).await,
            Action::RemoveEntry(_) | Action::RemoveFromList(_) => client.delete(&path).await,
            Action::ToggleFavorite(_) | Action::MarkHelpful(_) | Action::MarkUnhelpful(_) => {
                client.post::<Value>(&path, None).await
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change and a reload is on its way.
    Reloading,
    Failed,
}

/// Sends actions and reports the result through the toast and a reload.
pub struct Dispatcher<T, P> {
    client: ApiClient<T>,
    notifier: Rc<Notifier>,
    page: P,
    reload_delay: Duration,
}

impl<T: Transport, P: Page> Dispatcher<T, P> {
    pub fn new(client: ApiClient<T>, notifier: Rc<Notifier>, page: P, reload_delay: Duration) -> Self {
        Self {
            client,
            notifier,
            page,
            reload_delay,
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub async fn dispatch(&self, action: Result<Action, PayloadError>) -> Outcome {
        match action {
            Ok(action) => self.perform(action).await,
            Err(e) => self.fail(e.into()),
        }
    }

    pub async fn perform(&self, action: Action) -> Outcome {
        debug!("{} {:?}", action.method(), action);

        match action.send(&self.client).await {
            Ok(_) => {
                self.notifier.success(action.success_message());
                self.page.schedule_reload(self.reload_delay);
                Outcome::Reloading
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, e: ApiError) -> Outcome {
        match &e {
            ApiError::Invalid(reason) => warn!("not sending request: {}", reason),
            _ => error!("{}", e),
        }
        self.notifier.error(e.toast_message());
        Outcome::Failed
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, collections::HashMap};

    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::{
        api::{API_BASE, test::FakeTransport},
        notify::{Toast, ToastKind},
    };

    struct FakePage {
        notifier: Rc<Notifier>,
        /// Delay of every scheduled reload and the toast visible at that time.
        reloads: RefCell<Vec<(Duration, Option<Toast>)>>,
    }

    impl Page for FakePage {
        fn schedule_reload(&self, delay: Duration) {
            self.reloads
                .borrow_mut()
                .push((delay, self.notifier.current()));
        }
    }

    fn dispatcher(transport: FakeTransport) -> (Dispatcher<FakeTransport, FakePage>, Rc<Notifier>) {
        let notifier = Rc::new(Notifier::new());
        let page = FakePage {
            notifier: notifier.clone(),
            reloads: RefCell::new(vec![]),
        };
        let client = ApiClient::new(transport, API_BASE);
        (
            Dispatcher::new(client, notifier.clone(), page, Duration::from_millis(500)),
            notifier,
        )
    }

    #[test]
    fn test_add_to_list_sends_one_post() {
        let (dispatcher, notifier) = dispatcher(FakeTransport::default().respond(201, "{}"));

        for status in ["WATCHING", "COMPLETED", "ON_HOLD", "DROPPED", "PLAN_TO_WATCH"] {
            let fields = HashMap::from([("anime-id", "65f1c0ffee"), ("status", status)]);
            let outcome = block_on(dispatcher.dispatch(Action::add_to_list(&fields)));
            assert_eq!(outcome, Outcome::Reloading);

            let requests = dispatcher.client().transport().requests.borrow();
            let request = requests.last().unwrap();
            assert_eq!(request.method, Method::Post);
            assert_eq!(request.url, "/api/v1/lists");
            assert_eq!(
                serde_json::from_str::<Value>(request.body.as_deref().unwrap()).unwrap(),
                json!({ "animeId": "65f1c0ffee", "status": status })
            );
        }

        assert_eq!(dispatcher.client().transport().requests.borrow().len(), 5);
        assert_eq!(notifier.current().map(|t| t.kind), Some(ToastKind::Success));
    }

    #[test]
    fn test_success_schedules_single_reload_after_toast() {
        let (dispatcher, _) = dispatcher(FakeTransport::default().respond(200, ""));

        let fields = HashMap::from([
            ("anime-id", "a1"),
            ("status", "watching"),
            ("label", "Смотрю сейчас"),
        ]);
        block_on(dispatcher.dispatch(Action::add_to_list(&fields)));

        let reloads = dispatcher.page().reloads.borrow();
        assert_eq!(reloads.len(), 1);
        let (delay, toast) = &reloads[0];
        assert_eq!(*delay, Duration::from_millis(500));
        let toast = toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Добавлено: Смотрю сейчас");
    }

    #[test]
    fn test_server_error_never_reloads() {
        let (dispatcher, notifier) = dispatcher(
            FakeTransport::default().respond(500, r#"{"status":500,"message":"boom"}"#),
        );
        notifier.success("earlier toast");

        let fields = HashMap::from([("anime-id", "a1")]);
        let outcome = block_on(dispatcher.dispatch(Action::toggle_favorite(&fields)));

        assert_eq!(outcome, Outcome::Failed);
        assert!(dispatcher.page().reloads.borrow().is_empty());
        let toast = notifier.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Ошибка: boom");
    }

    #[test]
    fn test_network_error_toast() {
        let (dispatcher, notifier) = dispatcher(FakeTransport::default().unreachable());

        let fields = HashMap::from([("review-id", "r1")]);
        let outcome = block_on(dispatcher.dispatch(Action::mark_helpful(&fields)));

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(notifier.current().unwrap().message, "Ошибка сети");
        assert!(dispatcher.page().reloads.borrow().is_empty());
    }

    #[test]
    fn test_invalid_fields_send_nothing() {
        let (dispatcher, notifier) = dispatcher(FakeTransport::default());

        let fields = HashMap::from([("anime-id", "a1"), ("status", "binging")]);
        let outcome = block_on(dispatcher.dispatch(Action::add_to_list(&fields)));

        assert_eq!(outcome, Outcome::Failed);
        assert!(dispatcher.client().transport().requests.borrow().is_empty());
        assert_eq!(
            notifier.current().unwrap().message,
            "Ошибка: неизвестный статус: binging"
        );
    }

    #[test]
    fn test_remove_prefers_relation_id() {
        let fields = HashMap::from([("relation-id", "rel1"), ("anime-id", "a1")]);
        let action = Action::remove_from_list(&fields).unwrap();
        assert_eq!(action.method(), Method::Delete);
        assert_eq!(action.endpoint().path(), "/lists/rel1");

        let fields = HashMap::from([("anime-id", "a1")]);
        let action = Action::remove_from_list(&fields).unwrap();
        assert_eq!(action.endpoint().path(), "/lists/anime/a1");
    }

    #[test]
    fn test_review_and_status_requests() {
        let (dispatcher, _) = dispatcher(FakeTransport::default().respond(201, "{}").respond(200, "{}"));

        let form_attributes = HashMap::from([("anime-id", "a1")]);
        let form = HashMap::from([("rating", "10"), ("text", "A masterpiece start to finish")]);
        block_on(dispatcher.dispatch(Action::submit_review(&form_attributes, &form)));

        let fields = HashMap::from([("relation-id", "rel1"), ("status", "WATCHING")]);
        block_on(dispatcher.dispatch(Action::change_status(&fields, "dropped")));

        let requests = dispatcher.client().transport().requests.borrow();
        assert_eq!(requests[0].url, "/api/v1/reviews");
        assert_eq!(
            serde_json::from_str::<Value>(requests[0].body.as_deref().unwrap()).unwrap(),
            json!({
                "animeId": "a1",
                "rating": 10,
                "title": "",
                "text": "A masterpiece start to finish",
                "spoiler": false,
            })
        );
        assert_eq!(requests[1].method, Method::Put);
        assert_eq!(requests[1].url, "/api/v1/lists/rel1");
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"status":"DROPPED"}"#));
    }

    #[test]
    fn test_bodyless_posts() {
        let (dispatcher, _) = dispatcher(FakeTransport::default());

        let fields = HashMap::from([("review-id", "r1")]);
        block_on(dispatcher.dispatch(Action::mark_unhelpful(&fields)));

        let requests = dispatcher.client().transport().requests.borrow();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "/api/v1/reviews/r1/unhelpful");
        assert_eq!(requests[0].body, None);
    }

    #[test]
    fn test_status_comes_from_selected_value() {
        let fields = HashMap::from([("relation-id", "rel1")]);

        assert_eq!(
            Action::change_status(&fields, "ON_HOLD"),
            Ok(Action::ChangeStatus {
                relation_id: RelationId::parse("rel1").unwrap(),
                update: StatusUpdate { status: WatchStatus::OnHold },
            })
        );
        assert_eq!(
            Action::change_status(&fields, ""),
            Err(PayloadError::MissingField("status"))
        );
        assert_eq!(
            Action::change_status(&HashMap::<&str, &str>::new(), "ON_HOLD"),
            Err(PayloadError::MissingField("relation-id"))
        );
    }

    #[test]
    fn test_confirmation_question() {
        assert_eq!(confirmation(&HashMap::from([("anime-id", "a1")])), None);
        assert_eq!(
            confirmation(&HashMap::from([("confirm", "  ")])).as_deref(),
            Some("Вы уверены?")
        );
        assert_eq!(
            confirmation(&HashMap::from([("confirm", "Удалить из списка?")])).as_deref(),
            Some("Удалить из списка?")
        );
    }

    #[test]
    fn test_unread_body_decided_by_status() {
        let (dispatcher, notifier) =
            dispatcher(FakeTransport::default().respond_unread(200).respond_unread(500));
        let fields = HashMap::from([("anime-id", "a1")]);

        let outcome = block_on(dispatcher.dispatch(Action::toggle_favorite(&fields)));
        assert_eq!(outcome, Outcome::Reloading);
        assert_eq!(dispatcher.page().reloads.borrow().len(), 1);

        let outcome = block_on(dispatcher.dispatch(Action::toggle_favorite(&fields)));
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(notifier.current().unwrap().message, "Ошибка: 500");
        assert_eq!(dispatcher.page().reloads.borrow().len(), 1);
    }
}
