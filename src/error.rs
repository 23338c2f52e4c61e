use std::fmt::Display;

#[derive(Debug)]
pub enum ViewerError {
    Input(String),
    Parse(String),
    Shape(String),
    Search(String),
    Config(String),
    Render(String),
    Output(String),
}

impl Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (err_name, value) = match self {
            ViewerError::Input(v) => ("Input", v),
            ViewerError::Parse(v) => ("Parse", v),
            ViewerError::Shape(v) => ("Shape", v),
            ViewerError::Search(v) => ("Search", v),
            ViewerError::Config(v) => ("Config", v),
            ViewerError::Render(v) => ("Render", v),
            ViewerError::Output(v) => ("Output", v),
        };

        write!(f, "{} error: {}", err_name, value)
    }
}

impl std::error::Error for ViewerError {}
