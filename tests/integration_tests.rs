use model_viewer::core::{ErrorNotifier, PresentationSurface, StatusLog};
use model_viewer::models::{
    Attribute, Branch, DatasetHeader, DecisionTree, FilteredModel, LinearRegression, TreeNode,
};
use model_viewer::utils::error::DecodeCause;
use model_viewer::{
    DecodedObject, LoadResult, LocalStorage, ModelViewer, StreamReader, StreamWriter, TypeRegistry,
    ViewerContent, ViewerError,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Host {
    shown: Arc<Mutex<Vec<ViewerContent>>>,
    logs: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<(String, String)>>>,
}

impl PresentationSurface for Host {
    fn show(&mut self, content: &ViewerContent) {
        self.shown.lock().unwrap().push(content.clone());
    }
}

impl StatusLog for Host {
    fn log_message(&self, message: &str) {
        self.logs.lock().unwrap().push(message.to_string());
    }

    fn status_message(&self, _message: &str) {}
}

impl ErrorNotifier for Host {
    fn show_error(&self, title: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

type Viewer = ModelViewer<Host, LocalStorage, Host, Host>;

fn viewer(host: &Host) -> Viewer {
    ModelViewer::new(
        StreamReader::new(TypeRegistry::with_builtin_models()),
        host.clone(),
        LocalStorage::new(),
        host.clone(),
        host.clone(),
    )
}

fn weather_tree() -> DecisionTree {
    DecisionTree::new(
        "play",
        TreeNode::split(
            "outlook",
            vec![
                Branch::new("=", "sunny", TreeNode::leaf("no", 3.0)),
                Branch::new("=", "overcast", TreeNode::leaf("yes", 4.0)),
                Branch::new("=", "rainy", TreeNode::leaf("yes", 3.0)),
            ],
        ),
    )
}

fn weather_header() -> DatasetHeader {
    DatasetHeader::new(
        "weather",
        vec![
            Attribute::nominal("outlook", ["sunny", "overcast", "rainy"]),
            Attribute::nominal("play", ["yes", "no"]),
        ],
    )
}

fn empty_stream(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("empty.model");
    StreamWriter::create(&path).unwrap().finish().unwrap();
    path
}

#[test]
fn test_empty_stream_shows_no_tabs() {
    let dir = TempDir::new().unwrap();
    let path = empty_stream(&dir);
    let host = Host::default();
    let mut viewer = viewer(&host);

    let content = viewer.load(&path).unwrap();
    assert!(content.units.is_empty());
    assert_eq!(viewer.tab_count(), 0);
    assert_eq!(viewer.current_text(), "");

    let shown = host.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].units.is_empty());
}

#[test]
fn test_empty_stream_clears_previous_content() {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("tree.model");
    let mut writer = StreamWriter::create(&models).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.finish().unwrap();
    let empty = empty_stream(&dir);

    let host = Host::default();
    let mut viewer = viewer(&host);
    viewer.load(&models).unwrap();
    assert_eq!(viewer.tab_count(), 2);

    viewer.load(&empty).unwrap();
    assert_eq!(viewer.tab_count(), 0);
    assert_eq!(viewer.content().unwrap().path, empty);
}

#[test]
fn test_every_object_gets_one_primary_unit_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bundle.model");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&weather_header()).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer
        .write(&LinearRegression::new("temperature", 20.5).with_coefficient("humidity", -0.1))
        .unwrap();
    writer
        .write(&FilteredModel::new("Normalize", DecisionTree::unbuilt("play")))
        .unwrap();
    assert_eq!(writer.finish().unwrap(), 4);

    let host = Host::default();
    let mut viewer = viewer(&host);
    let content = viewer.load(&path).unwrap();

    assert_eq!(content.object_count(), 4);
    assert_eq!(
        content.labels(),
        vec![
            "DatasetHeader",
            "DecisionTree",
            "DecisionTree (graph)",
            "LinearRegression",
            "FilteredModel",
        ]
    );
    let indices: Vec<usize> = content.units.iter().map(|u| u.object_index).collect();
    assert_eq!(indices, vec![0, 1, 1, 2, 3]);
    assert_eq!(
        content.units[0].body,
        format!(
            "model_viewer::models::header::DatasetHeader\n\n{}\n",
            weather_header()
        )
    );
    // the unbuilt filtered model reports itself as not drawable: no diagnostic
    assert!(host.logs.lock().unwrap().is_empty());
}

#[test]
fn test_graph_failure_keeps_later_objects() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.model");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&DecisionTree::unbuilt("play")).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.finish().unwrap();

    let host = Host::default();
    let mut viewer = viewer(&host);
    let content = viewer.load(&path).unwrap();

    assert_eq!(
        content.labels(),
        vec!["DecisionTree", "DecisionTree", "DecisionTree (graph)"]
    );
    assert!(content.units[2].body.starts_with("digraph DecisionTree {\n"));
    assert!(content.units[2].body.ends_with("}\n"));

    let logs = host.logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("model_viewer::models::tree::DecisionTree"));
    assert!(logs[0].contains("no model built yet"));
    assert!(host.errors.lock().unwrap().is_empty());
}

#[test]
fn test_loading_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("twice.model");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.write(&weather_header()).unwrap();
    writer.finish().unwrap();

    let host = Host::default();
    let mut viewer = viewer(&host);
    let first = viewer.load(&path).unwrap().units.clone();
    let second = viewer.load(&path).unwrap().units.clone();

    assert_eq!(first, second);
}

#[test]
fn test_missing_file_keeps_displayed_content() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.model");
    let mut writer = StreamWriter::create(&good).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.finish().unwrap();
    let missing = dir.path().join("does-not-exist.model");

    let host = Host::default();
    let mut viewer = viewer(&host);
    viewer.load(&good).unwrap();
    let displayed = viewer.current_text().to_string();

    let err = viewer.load(&missing).unwrap_err();
    match &err {
        ViewerError::Decode { path, cause } => {
            assert_eq!(path, &missing);
            assert!(matches!(cause, DecodeCause::Io(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // policy: a failed load never touches what is on screen
    assert_eq!(viewer.current_text(), displayed);
    assert_eq!(host.shown.lock().unwrap().len(), 1);
    assert!(matches!(viewer.last_result(), Some(LoadResult::Failed(_))));

    let errors = host.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "Error loading model file");
    assert!(errors[0].1.contains("does-not-exist.model"));
}

#[test]
fn test_corrupt_file_fails_without_partial_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.model");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.write(&weather_header()).unwrap();
    writer.finish().unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

    let host = Host::default();
    let mut viewer = viewer(&host);
    assert!(viewer.load(&path).is_err());

    assert!(viewer.content().is_none());
    assert!(host.shown.lock().unwrap().is_empty());
}

#[test]
fn test_saved_body_reads_back_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.model");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&weather_tree()).unwrap();
    writer.finish().unwrap();
    let target = dir.path().join("out").join("tree.txt");

    let host = Host::default();
    let mut viewer = viewer(&host);
    viewer.load(&path).unwrap();
    viewer.select_tab(1).unwrap();
    viewer.save_content(&target).unwrap();

    let saved = std::fs::read_to_string(&target).unwrap();
    assert_eq!(saved, viewer.current_text());
}

#[test]
fn test_save_to_unwritable_path_reports_error() {
    let dir = TempDir::new().unwrap();
    let path = empty_stream(&dir);

    let host = Host::default();
    let mut viewer = viewer(&host);
    viewer.load(&path).unwrap();

    let err = viewer.save_content(dir.path()).unwrap_err();
    assert!(matches!(err, ViewerError::Persistence { .. }));
    let errors = host.errors.lock().unwrap();
    assert_eq!(errors[0].0, "Error writing content");
    assert!(errors[0]
        .1
        .starts_with(&format!("Failed to write content to {}\n", dir.path().display())));
}

#[test]
fn test_reader_alone_on_real_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reader.ser");
    let mut writer = StreamWriter::create(&path).unwrap();
    writer.write(&weather_header()).unwrap();
    writer.finish().unwrap();

    let objects = StreamReader::default().read_all(Path::new(&path)).unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(
        objects[0].type_name(),
        "model_viewer::models::header::DatasetHeader"
    );
    assert_eq!(objects[0].to_string(), weather_header().to_string());
}
