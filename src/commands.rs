use clap::Args;

use crate::{
    config::Style,
    error::ViewerError,
    loader,
    post_processor::{self, Figure, Line, PolygonCollection},
    search,
};

#[derive(Args, Debug, Clone)]
pub struct LimiterArgs {
    /// Limiter file: R values followed by Z values, whitespace delimited
    #[arg(long, default_value = "limiter.txt")]
    pub limiter: String,

    /// Triangle file: x,y pairs, three vertices per triangle
    #[arg(long, default_value = "triangles.txt")]
    pub triangles: String,

    /// Where to write the flattened (R,Z) pairs
    #[arg(long, default_value = "limit_flat")]
    pub flat_output: String,

    /// Also save the figure to this svg file
    #[arg(long)]
    pub figure: Option<String>,

    /// Do not open the figure in a viewer
    #[arg(long)]
    pub no_show: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Triangle file: x,y pairs, three vertices per triangle
    #[arg(long, default_value = "triangles.txt")]
    pub triangles: String,

    /// Search file: vertex-slot references, whitespace delimited
    #[arg(long, default_value = "search.txt")]
    pub search: String,

    /// Save the base mesh and highlighted figures
    #[arg(long)]
    pub save: bool,

    /// Output of the base mesh figure when saving
    #[arg(long, default_value = "triangles.svg")]
    pub mesh_figure: String,

    /// Output of the highlighted figure when saving
    #[arg(long, default_value = "path.svg")]
    pub path_figure: String,

    /// Do not open the figure in a viewer
    #[arg(long)]
    pub no_show: bool,
}

fn preview_path(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("meshview-{}-{name}.svg", std::process::id()))
        .to_string_lossy()
        .into_owned()
}

fn display(figure: &Figure, saved: Option<&str>, name: &str) -> Result<(), ViewerError> {
    match saved {
        Some(path) => post_processor::show(path),
        None => {
            let path = preview_path(name);
            figure.save(&path)?;
            post_processor::show(&path)
        }
    }
}

/// Plots the limiter over the mesh and dumps the (R,Z) pairs
///
/// # Returns
/// The figure as drawn
pub fn limiter(args: &LimiterArgs, style: &Style) -> Result<Figure, ViewerError> {
    let limiter = loader::load_limiter(&args.limiter)?;
    loader::write_flat_pairs(&limiter, &args.flat_output)?;

    let mesh = loader::load_triangles(&args.triangles)?;

    let mut figure = Figure::new(style.width, style.height);
    figure
        .axes
        .add_collection(PolygonCollection::from_triangles("mesh", &mesh, None, &style.mesh)?);
    figure
        .axes
        .plot(Line::new("limiter", limiter.points(), &style.limiter));
    figure.axes.autoscale_view();

    if let Some(path) = &args.figure {
        figure.save(path)?;
    }

    if !args.no_show {
        display(&figure, args.figure.as_deref(), "limiter")?;
    }

    Ok(figure)
}

/// Plots the mesh and highlights the triangles named by the search file
///
/// # Returns
/// The figure as drawn, highlights included
pub fn search(args: &SearchArgs, style: &Style) -> Result<Figure, ViewerError> {
    let mesh = loader::load_triangles(&args.triangles)?;
    let search_values = loader::load_search(&args.search)?;
    let selected = search::select_triangles(&mesh, &search_values)?;

    let mut figure = Figure::new(style.width, style.height);
    figure
        .axes
        .add_collection(PolygonCollection::from_triangles("mesh", &mesh, None, &style.mesh)?);
    figure.axes.autoscale_view();

    if args.save {
        figure.save(&args.mesh_figure)?;
    }

    figure.axes.add_collection(PolygonCollection::from_triangles(
        "highlight",
        &mesh,
        Some(selected.as_slice()),
        &style.highlight,
    )?);

    if args.save {
        figure.save(&args.path_figure)?;
    }

    if !args.no_show {
        let saved = if args.save {
            Some(args.path_figure.as_str())
        } else {
            None
        };
        display(&figure, saved, "search")?;
    }

    Ok(figure)
}
