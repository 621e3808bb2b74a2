//! In-memory page used by the unit tests.
//!
//! Elements live in an arena in document order. Selectors support tag and
//! class compounds joined by the descendant combinator, which covers every
//! selector the publisher uses.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::page::{ElementHandle, Key, Page, PageError};

/// A recorded page interaction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Navigate(String),
    Click(ElementHandle),
    Type { element: ElementHandle, text: String },
    SetFiles { element: ElementHandle, paths: Vec<PathBuf> },
    SendKey { element: ElementHandle, key: Key },
}

struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    text: String,
    parent: Option<usize>,
    visible: bool,
    appears_at: Option<Instant>,
}

impl Node {
    fn present(&self) -> bool {
        self.appears_at.is_none_or(|at| Instant::now() >= at)
    }

    fn matches(&self, compound: &Compound) -> bool {
        compound.tag.as_ref().is_none_or(|tag| *tag == self.tag)
            && compound.classes.iter().all(|c| self.classes.contains(c))
    }
}

struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

fn parse_compound(raw: &str) -> Compound {
    let mut parts = raw.split('.');
    let tag = parts.next().filter(|t| !t.is_empty()).map(str::to_string);
    Compound {
        tag,
        classes: parts.map(str::to_string).collect(),
    }
}

#[derive(Default)]
struct Dom {
    nodes: Vec<Node>,
    calls: Vec<Call>,
    failing_text: HashSet<String>,
    failing_clicks: HashSet<usize>,
    failing_navigation: bool,
    stale_attributes: HashSet<usize>,
    released: Vec<ElementHandle>,
}

impl Dom {
    fn index(&self, element: &ElementHandle) -> Result<usize, PageError> {
        element
            .id()
            .strip_prefix('n')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n < self.nodes.len())
            .ok_or_else(|| PageError::ElementNotFound(element.to_string()))
    }

    fn matches(&self, index: usize, selector: &[Compound]) -> bool {
        let Some((last, ancestors)) = selector.split_last() else {
            return false;
        };
        if !self.nodes[index].matches(last) {
            return false;
        }

        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = self.nodes[index].parent;
        while let Some(wanted) = remaining.peek() {
            match current {
                Some(i) => {
                    if self.nodes[i].matches(wanted) {
                        remaining.next();
                    }
                    current = self.nodes[i].parent;
                }
                None => return false,
            }
        }
        true
    }

    fn select(&self, selector: &str) -> Vec<usize> {
        let compounds: Vec<Compound> = selector.split_whitespace().map(parse_compound).collect();
        (0..self.nodes.len())
            .filter(|i| self.nodes[*i].present() && self.matches(*i, &compounds))
            .collect()
    }
}

fn handle(index: usize) -> ElementHandle {
    ElementHandle::new(format!("n{}", index))
}

/// In-memory [`Page`] with call recording and fault injection.
pub(crate) struct FakePage {
    dom: Mutex<Dom>,
}

impl FakePage {
    /// Empty document with an `html` root at index 0.
    pub(crate) fn new() -> Self {
        let page = Self {
            dom: Mutex::new(Dom::default()),
        };
        page.dom.lock().nodes.push(Node {
            tag: "html".to_string(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            text: String::new(),
            parent: None,
            visible: true,
            appears_at: None,
        });
        page
    }

    pub(crate) const ROOT: usize = 0;

    /// Append a child described as `tag.class1.class2`.
    pub(crate) fn add(&self, parent: usize, spec: &str) -> usize {
        let compound = parse_compound(spec);
        let mut dom = self.dom.lock();
        dom.nodes.push(Node {
            tag: compound.tag.unwrap_or_else(|| "div".to_string()),
            classes: compound.classes,
            attributes: HashMap::new(),
            text: String::new(),
            parent: Some(parent),
            visible: true,
            appears_at: None,
        });
        dom.nodes.len() - 1
    }

    pub(crate) fn set_attribute(&self, node: usize, name: &str, value: &str) {
        self.dom.lock().nodes[node]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub(crate) fn set_text(&self, node: usize, text: &str) {
        self.dom.lock().nodes[node].text = text.to_string();
    }

    pub(crate) fn hide(&self, node: usize) {
        self.dom.lock().nodes[node].visible = false;
    }

    /// Keep `node` out of query results until `delay` has elapsed.
    pub(crate) fn appear_after(&self, node: usize, delay: Duration) {
        self.dom.lock().nodes[node].appears_at = Some(Instant::now() + delay);
    }

    /// Make typing exactly `text` fail.
    pub(crate) fn fail_typing(&self, text: &str) {
        self.dom.lock().failing_text.insert(text.to_string());
    }

    pub(crate) fn fail_click(&self, node: usize) {
        self.dom.lock().failing_clicks.insert(node);
    }

    /// Fail the next attribute read on `node`, as if it had re-rendered.
    pub(crate) fn stale_attribute_once(&self, node: usize) {
        self.dom.lock().stale_attributes.insert(node);
    }

    pub(crate) fn released(&self) -> Vec<ElementHandle> {
        self.dom.lock().released.clone()
    }

    pub(crate) fn fail_navigation(&self) {
        self.dom.lock().failing_navigation = true;
    }

    pub(crate) fn handle(&self, node: usize) -> ElementHandle {
        handle(node)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.dom.lock().calls.clone()
    }

    /// Texts typed into `node`, in order.
    pub(crate) fn typed_into(&self, node: usize) -> Vec<String> {
        let target = handle(node);
        self.dom
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Type { element, text } if *element == target => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Chain of `depth` plain `div`s under `parent`, returning the deepest.
    pub(crate) fn add_chain(&self, parent: usize, depth: usize) -> usize {
        (0..depth).fold(parent, |p, _| self.add(p, "div"))
    }
}

/// Element indices of a full creator page built by [`publish_page`].
pub(crate) struct PublishPageNodes {
    pub(crate) upload_input: usize,
    pub(crate) image_tab: usize,
    pub(crate) title_input: usize,
    pub(crate) editor: usize,
    pub(crate) submit: usize,
}

/// Creator page in the "direct" editor shape, with every selector the
/// default configuration looks for.
pub(crate) fn publish_page() -> (FakePage, PublishPageNodes) {
    let page = FakePage::new();
    let body = page.add(FakePage::ROOT, "body");

    let upload = page.add(body, "div.upload-content");
    let upload_input = page.add(upload, "input.upload-input");
    page.hide(upload_input);

    let video_tab = page.add(body, "div.creator-tab");
    page.set_text(video_tab, "上传视频");
    let image_tab = page.add(body, "div.creator-tab");
    page.set_text(image_tab, "上传图文");

    let title_box = page.add(body, "div.d-input");
    let title_input = page.add(title_box, "input");

    let editor = page.add(body, "div.ql-editor");

    let submit_box = page.add(body, "div.submit");
    let submit = page.add(submit_box, "div.d-button-content");

    (
        page,
        PublishPageNodes {
            upload_input,
            image_tab,
            title_input,
            editor,
            submit,
        },
    )
}

#[async_trait]
impl Page for FakePage {
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        dom.calls.push(Call::Navigate(url.to_string()));
        if dom.failing_navigation {
            return Err(PageError::Navigation(format!("{} unreachable", url)));
        }
        Ok(())
    }

    async fn wait_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, PageError> {
        let start = Instant::now();
        loop {
            let found = {
                let dom = self.dom.lock();
                dom.select(selector)
                    .into_iter()
                    .find(|i| dom.nodes[*i].visible)
            };
            if let Some(index) = found {
                return Ok(handle(index));
            }
            if start.elapsed() >= timeout {
                return Err(PageError::timeout(
                    format!("wait for {} to be visible", selector),
                    timeout,
                ));
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    async fn query_one(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.dom.lock().select(selector).first().copied().map(handle))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        Ok(self.dom.lock().select(selector).into_iter().map(handle).collect())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        let index = dom.index(element)?;
        dom.calls.push(Call::Click(element.clone()));
        if dom.failing_clicks.contains(&index) {
            return Err(PageError::Interaction(format!("{} is not clickable", element)));
        }
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        dom.index(element)?;
        if dom.failing_text.contains(text) {
            return Err(PageError::Interaction(format!("typing {:?} rejected", text)));
        }
        dom.calls.push(Call::Type {
            element: element.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_files(
        &self,
        element: &ElementHandle,
        paths: &[PathBuf],
    ) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        dom.index(element)?;
        dom.calls.push(Call::SetFiles {
            element: element.clone(),
            paths: paths.to_vec(),
        });
        Ok(())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        let mut dom = self.dom.lock();
        let index = dom.index(element)?;
        if dom.stale_attributes.remove(&index) {
            return Err(PageError::Interaction(
                "Could not find node with given id".to_string(),
            ));
        }
        Ok(dom.nodes[index].attributes.get(name).cloned())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, PageError> {
        let dom = self.dom.lock();
        let index = dom.index(element)?;
        Ok(dom.nodes[index].text.clone())
    }

    async fn parent(&self, element: &ElementHandle) -> Result<Option<ElementHandle>, PageError> {
        let dom = self.dom.lock();
        let index = dom.index(element)?;
        Ok(dom.nodes[index].parent.map(handle))
    }

    async fn send_key(&self, element: &ElementHandle, key: Key) -> Result<(), PageError> {
        let mut dom = self.dom.lock();
        dom.index(element)?;
        dom.calls.push(Call::SendKey {
            element: element.clone(),
            key,
        });
        Ok(())
    }

    async fn release(&self, elements: &[ElementHandle]) {
        self.dom.lock().released.extend_from_slice(elements);
    }
}
