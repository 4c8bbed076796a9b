//! Application shell
//!
//! The shell plays the router: it owns the active page, renders it into the
//! root region and wires the page's handlers into the [`Dispatcher`].
//!
//! ```text
//! navigate(route) ──▶ drop old page (tokens unregister its handlers)
//!                 ──▶ build controller ──▶ load ──▶ render root
//!                 ──▶ register page handlers
//!
//! dispatch(event) ──▶ post ──▶ run_until_idle ──▶ pending route? ──▶ navigate
//!                                                          └─ no ──▶ re-render
//! ```

use crate::config::AppConfig;
use crate::controllers::bills::BILL_URL_ATTRIBUTE;
use crate::controllers::{BillsController, BillsView, NewBillController, NewBillView};
use crate::core::error::{BilledError, BilledResult};
use crate::core::events::{DispatchReport, Dispatcher, ElementRef, EventKind, HandlerToken, UiEvent};
use crate::core::routes::{Route, RouteHistory};
use crate::core::store::StoreGateway;
use crate::storage::LocalStorage;
use crate::views::Renderer;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::Mutex;

enum PageController {
    Bills(Arc<Mutex<BillsController>>),
    NewBill(Arc<Mutex<NewBillController>>),
}

/// The displayed page and the registrations that live as long as it does
struct Page {
    controller: PageController,
    _tokens: Vec<HandlerToken>,
}

pub struct App {
    store: Option<Arc<dyn StoreGateway>>,
    local_storage: Arc<dyn LocalStorage>,
    config: Arc<AppConfig>,
    renderer: Renderer,
    history: Arc<RouteHistory>,
    dispatcher: Dispatcher,
    page: Option<Page>,
    root: String,
}

impl App {
    pub fn new(
        store: Option<Arc<dyn StoreGateway>>,
        local_storage: Arc<dyn LocalStorage>,
        config: AppConfig,
    ) -> BilledResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            local_storage,
            config: Arc::new(config),
            renderer: Renderer::new()?,
            history: Arc::new(RouteHistory::new()),
            dispatcher: Dispatcher::new(),
            page: None,
            root: String::new(),
        })
    }

    /// Display `route`, replacing the current page
    ///
    /// A failed bills load is not an error here: the error page is what gets
    /// displayed.
    pub async fn navigate(&mut self, route: Route) -> BilledResult<()> {
        self.page = None;
        self.root = self.renderer.render_loading()?;
        tracing::info!(route = %route, "displaying page");

        let page = match route {
            Route::Bills => self.open_bills().await?,
            Route::NewBill => self.open_new_bill()?,
        };
        self.page = Some(page);
        self.history.record(route);
        Ok(())
    }

    /// Display the page behind a hash path
    pub async fn navigate_path(&mut self, path: &str) -> BilledResult<()> {
        let route = Route::from_path(path)?;
        self.navigate(route).await
    }

    /// Queue `event` and process it with the handlers of the current page
    pub async fn dispatch(&mut self, event: UiEvent) -> BilledResult<DispatchReport> {
        self.dispatcher.post(event)?;
        let report = self.dispatcher.run_until_idle().await?;

        match self.history.take_pending() {
            Some(route) => self.navigate(route).await?,
            None => self.refresh().await?,
        }
        Ok(report)
    }

    /// Markup of the root region
    pub fn root_html(&self) -> &str {
        &self.root
    }

    /// Route of the displayed page
    pub fn current_route(&self) -> Option<Route> {
        self.page.as_ref().and(self.history.current())
    }

    /// Every displayed route, oldest first
    pub fn history(&self) -> Vec<Route> {
        self.history.visited()
    }

    /// Eye icons of the bills page, as click targets
    pub async fn icon_eye_targets(&self) -> Vec<ElementRef> {
        let Some(view) = self.bills_view().await else {
            return Vec::new();
        };
        view.bills
            .iter()
            .map(|bill| {
                ElementRef::new("div")
                    .with_attribute("data-testid", "icon-eye")
                    .with_attribute(BILL_URL_ATTRIBUTE, bill.file_url.clone().unwrap_or_default())
            })
            .collect()
    }

    /// Snapshot of the bills page state, when it is displayed
    pub async fn bills_view(&self) -> Option<BillsView> {
        match &self.page.as_ref()?.controller {
            PageController::Bills(c) => Some(c.lock().await.view().clone()),
            PageController::NewBill(_) => None,
        }
    }

    /// Snapshot of the new bill page state, when it is displayed
    pub async fn new_bill_view(&self) -> Option<NewBillView> {
        match &self.page.as_ref()?.controller {
            PageController::NewBill(c) => Some(c.lock().await.view().clone()),
            PageController::Bills(_) => None,
        }
    }

    async fn refresh(&mut self) -> BilledResult<()> {
        let Some(page) = &self.page else {
            return Ok(());
        };
        self.root = match &page.controller {
            PageController::Bills(c) => self.renderer.render_bills(c.lock().await.view())?,
            PageController::NewBill(c) => self.renderer.render_new_bill(c.lock().await.view())?,
        };
        Ok(())
    }

    async fn open_bills(&mut self) -> BilledResult<Page> {
        let mut controller = BillsController::new(
            self.store.clone(),
            self.history.clone(),
            self.local_storage.clone(),
            self.config.clone(),
        );
        if let Err(e) = controller.load().await {
            tracing::warn!(code = e.error_code(), "bills page shows a load error");
        }
        self.root = self.renderer.render_bills(controller.view())?;

        let controller = Arc::new(Mutex::new(controller));
        let mut tokens = Vec::new();

        let c = Arc::clone(&controller);
        tokens.push(self.dispatcher.register(EventKind::IconEyeClicked, move |event| {
            let c = Arc::clone(&c);
            async move {
                if let UiEvent::IconEyeClicked { target } = event {
                    c.lock().await.handle_click_icon_eye(&target)?;
                }
                Ok::<(), BilledError>(())
            }
            .boxed()
        })?);

        let c = Arc::clone(&controller);
        tokens.push(self.dispatcher.register(EventKind::ModalClosed, move |_| {
            let c = Arc::clone(&c);
            async move {
                c.lock().await.close_modal();
                Ok(())
            }
            .boxed()
        })?);

        let c = Arc::clone(&controller);
        tokens.push(self.dispatcher.register(EventKind::NewBillClicked, move |_| {
            let c = Arc::clone(&c);
            async move {
                c.lock().await.handle_click_new_bill();
                Ok(())
            }
            .boxed()
        })?);

        Ok(Page {
            controller: PageController::Bills(controller),
            _tokens: tokens,
        })
    }

    fn open_new_bill(&mut self) -> BilledResult<Page> {
        let controller = NewBillController::new(
            self.store.clone(),
            self.history.clone(),
            self.local_storage.clone(),
            &self.config,
        )?;
        self.root = self.renderer.render_new_bill(controller.view())?;

        let controller = Arc::new(Mutex::new(controller));
        let mut tokens = Vec::new();

        let c = Arc::clone(&controller);
        tokens.push(self.dispatcher.register(EventKind::FileChanged, move |event| {
            let c = Arc::clone(&c);
            async move {
                if let UiEvent::FileChanged { file } = event {
                    // A rejected file is reported by the warning in the view
                    match c.lock().await.handle_change_file(file) {
                        Ok(_) | Err(BilledError::Validation(_)) => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            }
            .boxed()
        })?);

        let c = Arc::clone(&controller);
        tokens.push(self.dispatcher.register(EventKind::FormSubmitted, move |event| {
            let c = Arc::clone(&c);
            async move {
                if let UiEvent::FormSubmitted { form } = event {
                    match c.lock().await.handle_submit(form).await {
                        Ok(_) | Err(BilledError::Validation(_)) => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            }
            .boxed()
        })?);

        Ok(Page {
            controller: PageController::NewBill(controller),
            _tokens: tokens,
        })
    }
}
