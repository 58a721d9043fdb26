//! SVG path data parsing

use glint_core::{Path, PathCommand, Point};
use usvg::{Options, Tree};

use crate::error::SvgError;

/// Parse SVG path data (the `d` attribute) into a Glint [`Path`]
///
/// Parsing goes through `usvg`, so arcs, relative and shorthand commands are
/// normalized to absolute lines and curves. Multiple subpaths are kept.
pub fn parse_path_data(data: &str) -> Result<Path, SvgError> {
    if data.contains(|c: char| c == '"' || c == '<' || c == '&') {
        return Err(SvgError::Parse(format!("invalid path data: {data}")));
    }

    let markup = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><path d="{data}"/></svg>"#
    );
    let tree = Tree::from_str(&markup, &Options::default())
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut commands = Vec::new();
    collect_commands(tree.root(), &mut commands);
    if commands.is_empty() {
        return Err(SvgError::EmptyPath);
    }
    Ok(Path::from_commands(commands))
}

fn collect_commands(group: &usvg::Group, out: &mut Vec<PathCommand>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_commands(g, out),
            usvg::Node::Path(p) => {
                out.extend_from_slice(usvg_path_to_glint(p.data()).commands());
            }
            _ => {}
        }
    }
}

/// Convert usvg path data to a Glint Path
pub fn usvg_path_to_glint(path_data: &usvg::tiny_skia_path::Path) -> Path {
    let mut commands = Vec::new();

    for segment in path_data.segments() {
        match segment {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                commands.push(PathCommand::MoveTo(Point::new(p.x, p.y)));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                commands.push(PathCommand::LineTo(Point::new(p.x, p.y)));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(c, e) => {
                commands.push(PathCommand::QuadTo {
                    control: Point::new(c.x, c.y),
                    end: Point::new(e.x, e.y),
                });
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(c1, c2, e) => {
                commands.push(PathCommand::CubicTo {
                    control1: Point::new(c1.x, c1.y),
                    control2: Point::new(c2.x, c2.y),
                    end: Point::new(e.x, e.y),
                });
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                commands.push(PathCommand::Close);
            }
        }
    }

    Path::from_commands(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_commands() {
        let path = parse_path_data("M10,10 L20,10 C25,10 30,15 30,20 Z").unwrap();
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(10.0, 10.0)),
                PathCommand::LineTo(Point::new(20.0, 10.0)),
                PathCommand::CubicTo {
                    control1: Point::new(25.0, 10.0),
                    control2: Point::new(30.0, 15.0),
                    end: Point::new(30.0, 20.0),
                },
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_relative_commands_are_absolute() {
        let path = parse_path_data("M10,10 l5,0 l0,5").unwrap();
        assert_eq!(path.commands()[2], PathCommand::LineTo(Point::new(15.0, 15.0)));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(parse_path_data(""), Err(SvgError::EmptyPath)));
        assert!(matches!(parse_path_data("M0,0"), Err(SvgError::EmptyPath)));
        assert!(matches!(
            parse_path_data(r#"M0,0" onload="x"#),
            Err(SvgError::Parse(_))
        ));
    }
}
