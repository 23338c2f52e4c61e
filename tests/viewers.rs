use std::fs;
use std::path::PathBuf;

use meshview::commands::{self, LimiterArgs, SearchArgs};
use meshview::config::Style;
use meshview::error::ViewerError;
use meshview::loader;

struct Workdir {
    root: PathBuf,
}

impl Workdir {
    fn new(name: &str) -> Workdir {
        let root = std::env::temp_dir().join(format!("meshview-it-{}-{name}", std::process::id()));
        fs::create_dir_all(&root).unwrap();
        Workdir { root }
    }

    fn path(&self, file: &str) -> String {
        self.root.join(file).to_string_lossy().into_owned()
    }

    fn write(&self, file: &str, contents: &str) -> String {
        let path = self.path(file);
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Workdir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

// Two triangles in the "%f, %f\n %f, %f\n %f, %f\n" layout
const TRIANGLES: &str = "0.000000, 0.000000\n 1.000000, 0.000000\n 1.000000, 1.000000\n\
0.000000, 0.000000\n 1.000000, 1.000000\n 0.000000, 1.000000\n";

fn count_polygons(svg_path: &str, group_id: &str) -> usize {
    let contents = fs::read_to_string(svg_path).unwrap();
    let doc = roxmltree::Document::parse(&contents).unwrap();
    doc.descendants()
        .filter(|n| n.tag_name().name() == "g" && n.attribute("id") == Some(group_id))
        .flat_map(|g| g.children())
        .filter(|n| n.tag_name().name() == "polygon")
        .count()
}

#[test]
fn limiter_writes_paired_coordinates() {
    let dir = Workdir::new("limiter");
    let limiter = dir.write("limiter.txt", "0 1 2 3");
    let triangles = dir.write("triangles.txt", TRIANGLES);
    let args = LimiterArgs {
        limiter,
        triangles,
        flat_output: dir.path("limit_flat"),
        figure: Some(dir.path("limiter.svg")),
        no_show: true,
    };

    let figure = commands::limiter(&args, &Style::default()).unwrap();

    let flat = fs::read_to_string(dir.path("limit_flat")).unwrap();
    let rows: Vec<&str> = flat.lines().collect();
    assert_eq!(rows, vec!["0,2", "1,3"]);

    let reloaded = loader::load_flat_pairs(&dir.path("limit_flat")).unwrap();
    assert_eq!(reloaded.r(), vec![0.0, 1.0]);
    assert_eq!(reloaded.z(), vec![2.0, 3.0]);

    assert_eq!(figure.axes.collections.len(), 1);
    assert_eq!(figure.axes.lines.len(), 1);
    assert_eq!(count_polygons(&dir.path("limiter.svg"), "mesh"), 2);

    let svg = fs::read_to_string(dir.path("limiter.svg")).unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let line = doc
        .descendants()
        .find(|n| n.attribute("id") == Some("limiter"))
        .unwrap();
    assert_eq!(line.tag_name().name(), "polyline");
    assert_eq!(line.attribute("points").unwrap().split(' ').count(), 2);
}

#[test]
fn limiter_with_odd_count_fails_before_writing() {
    let dir = Workdir::new("limiter-odd");
    let args = LimiterArgs {
        limiter: dir.write("limiter.txt", "0 1 2"),
        triangles: dir.write("triangles.txt", TRIANGLES),
        flat_output: dir.path("limit_flat"),
        figure: None,
        no_show: true,
    };

    let err = commands::limiter(&args, &Style::default()).unwrap_err();
    assert!(matches!(err, ViewerError::Shape(_)));
    assert!(!std::path::Path::new(&dir.path("limit_flat")).exists());
}

#[test]
fn search_saves_base_and_highlighted_figures() {
    let dir = Workdir::new("search");
    let args = SearchArgs {
        triangles: dir.write("triangles.txt", TRIANGLES),
        search: dir.write("search.txt", "3\n"),
        save: true,
        mesh_figure: dir.path("triangles.svg"),
        path_figure: dir.path("path.svg"),
        no_show: true,
    };

    let figure = commands::search(&args, &Style::default()).unwrap();
    assert_eq!(figure.axes.collections.len(), 2);
    assert_eq!(figure.axes.collections[1].len(), 1);

    assert_eq!(count_polygons(&dir.path("triangles.svg"), "mesh"), 2);
    assert_eq!(count_polygons(&dir.path("triangles.svg"), "highlight"), 0);

    assert_eq!(count_polygons(&dir.path("path.svg"), "mesh"), 2);
    assert_eq!(count_polygons(&dir.path("path.svg"), "highlight"), 1);
}

#[test]
fn search_without_save_writes_no_figures() {
    let dir = Workdir::new("search-nosave");
    let args = SearchArgs {
        triangles: dir.write("triangles.txt", TRIANGLES),
        search: dir.write("search.txt", "0 3.9 5"),
        save: false,
        mesh_figure: dir.path("triangles.svg"),
        path_figure: dir.path("path.svg"),
        no_show: true,
    };

    let figure = commands::search(&args, &Style::default()).unwrap();
    assert_eq!(figure.axes.collections[1].len(), 3);
    assert!(!std::path::Path::new(&dir.path("triangles.svg")).exists());
    assert!(!std::path::Path::new(&dir.path("path.svg")).exists());
}

#[test]
fn search_past_the_mesh_is_an_error() {
    let dir = Workdir::new("search-range");
    let args = SearchArgs {
        triangles: dir.write("triangles.txt", TRIANGLES),
        search: dir.write("search.txt", "0\n6\n"),
        save: true,
        mesh_figure: dir.path("triangles.svg"),
        path_figure: dir.path("path.svg"),
        no_show: true,
    };

    let err = commands::search(&args, &Style::default()).unwrap_err();
    assert!(matches!(err, ViewerError::Search(_)));
    assert!(!std::path::Path::new(&dir.path("triangles.svg")).exists());
}

#[test]
fn malformed_triangle_file_is_rejected() {
    let dir = Workdir::new("search-shape");
    let args = SearchArgs {
        triangles: dir.write("triangles.txt", "0, 0\n1, 0\n1, 1\n0, 1\n"),
        search: dir.write("search.txt", "0"),
        save: false,
        mesh_figure: dir.path("triangles.svg"),
        path_figure: dir.path("path.svg"),
        no_show: true,
    };

    let err = commands::search(&args, &Style::default()).unwrap_err();
    assert!(matches!(err, ViewerError::Shape(_)));
}
