use std::{
    f64::consts::PI,
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use itertools::Itertools;
use log::{debug, info};
use nalgebra::Point2;
use parasolv::prelude::*;
use tracing_subscriber::filter::LevelFilter;

/// Markers for the points of each column.
const POINT_MARKERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Markers for the segments joining consecutive rows of each column.
const LINE_MARKERS: [char; 5] = ['.', '-', ':', '~', '\''];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Intersect(args) => intersect(args),
        Command::Plot(args) => plot(args),
    }
}

/// Intersections of parametric plane curves, with a console plotter.
#[derive(ClapParser)]
#[command(version, about)]
pub struct Args {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Intersect one of the built-in curve pairs.
    Intersect(IntersectArgs),
    /// Plot numeric columns read from a file or stdin.
    Plot(PlotArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Preset {
    /// Two straight segments crossing once.
    Lines,
    /// An arc of the heart curve against the graph of a smooth function.
    Heart,
}

/// Arguments to [`intersect`].
#[derive(clap::Args)]
pub struct IntersectArgs {
    /// The curve pair to intersect.
    #[arg(short, long, value_enum, default_value_t = Preset::Lines)]
    preset: Preset,
    /// Number of seed samples per curve.
    #[arg(long, default_value_t = 16)]
    seeds: usize,
    /// Maximum number of refinement rounds.
    #[arg(short, long, default_value_t = 64)]
    rounds: usize,
    /// Boxes with a smaller diagonal are considered resolved.
    #[arg(short, long, default_value_t = 1e-6)]
    tolerance: f64,
    /// Draw both curves and the intersections.
    #[arg(long)]
    plot: bool,
}

/// Arguments to [`plot`].
#[derive(clap::Args)]
pub struct PlotArgs {
    /// The input file. Reads stdin when unspecified.
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Treat the first column as x values and the following ones as y values.
    #[arg(short, long)]
    xy: bool,
    /// Columns to plot, zero based. Repeat if needed. Default: all.
    #[arg(short, long = "col")]
    cols: Vec<usize>,
    /// Skip the first line of the input.
    #[arg(short, long)]
    ignore_first: bool,
    /// Column separator.
    #[arg(short, long, default_value = " ")]
    sep: String,
    /// Sampling step of the segments joining consecutive rows.
    #[arg(short, long, default_value_t = 0.01)]
    gap: f64,
}

fn heart() -> ParaFunc<impl Fn(f64) -> f64, impl Fn(f64) -> f64> {
    ParaFunc::new(
        |t: f64| 16. * t.sin().powi(3),
        |t: f64| 13. * t.cos() - 5. * (2. * t).cos() - 2. * (3. * t).cos() - (4. * t).cos(),
    )
}

fn wave() -> Function<impl Fn(f64) -> f64> {
    Function::new(|s: f64| s - 8. * (0.1 * s).cos().powi(3) + 0.003 * s * s)
}

/// Run the solver on a preset curve pair and print what it finds.
pub fn intersect(args: IntersectArgs) -> anyhow::Result<()> {
    let options = ParaSolverOptions::default()
        .with_seed_samples(args.seeds)
        .with_max_rounds(args.rounds)
        .with_tolerance(args.tolerance);
    info!("intersecting {:?} with {:?}", args.preset, options);

    let (intersections, plot) = match args.preset {
        Preset::Lines => {
            let f = Line::new(Point2::new(0., 0.), Point2::new(6., 10.));
            let g = Line::new(Point2::new(1., 6.), Point2::new(3., 2.));
            let intersections = ParaSolver::new(&f, &g)
                .try_find_intersections((0., 1.), (0., 1.), Some(options))
                .with_context(|| "Failed to intersect the lines.")?;

            let mut plot = TextPlot::new();
            plot.try_add_curve(&f, 0., 1., 0.01, 'o')?;
            plot.try_add_curve(&g, 0., 1., 0.01, 'x')?;
            plot.fit_all();
            (intersections, plot)
        }
        Preset::Heart => {
            let f = heart();
            let g = wave();
            let intersections = ParaSolver::new(&f, &g)
                .try_find_intersections((18. * PI / 60., 26. * PI / 60.), (9.22, 13.88), Some(options))
                .with_context(|| "Failed to intersect the heart with the curve.")?;

            let mut plot = TextPlot::new();
            plot.try_add_curve(&f, -PI, PI, 0.01, 'o')?;
            plot.try_add_curve(&g, -20., 20., 0.01, 'x')?;
            plot.zoom(Some(-1.), Some(17.), Some(-1.), Some(17.));
            (intersections, plot)
        }
    };

    println!("{} intersection(s)", intersections.len());
    for it in intersections.iter() {
        let ((p, t), (q, s)) = (it.a(), it.b());
        println!(
            "t = {:.9}, s = {:.9}, f(t) = ({:.9}, {:.9}), g(s) = ({:.9}, {:.9})",
            t, s, p.x, p.y, q.x, q.y
        );
    }

    if args.plot {
        let mut plot = plot;
        for it in intersections.iter() {
            plot.add_point(it.a().0, 'R');
        }
        println!("{}", plot.try_render()?);
    }

    Ok(())
}

/// Parse one input line into its numeric values.
fn parse_row(line: &str, sep: &str) -> anyhow::Result<Vec<f64>> {
    line.trim()
        .split(sep)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("Failed to parse {:?} as a number.", v))
        })
        .collect()
}

/// One row of (column, point) per non empty input line.
type Rows = Vec<Vec<(usize, Point2<f64>)>>;

/// Read the selected columns of a table as points.
/// x is the line number, or the first column with `--xy`.
fn read_rows<R: BufRead>(reader: R, args: &PlotArgs) -> anyhow::Result<Rows> {
    let mut rows = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| "Failed to read input.")?;
        if index == 0 && args.ignore_first {
            continue;
        }
        let values = parse_row(&line, &args.sep)
            .with_context(|| format!("Failed to parse line {}.", index + 1))?;
        if values.is_empty() {
            continue;
        }
        let (x, first) = if args.xy {
            (values[0], 1)
        } else {
            ((index + 1) as f64, 0)
        };
        let row = values
            .iter()
            .enumerate()
            .skip(first)
            .filter(|(column, _)| args.cols.is_empty() || args.cols.contains(column))
            .map(|(column, y)| (column, Point2::new(x, *y)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Draw the points of every column, joined row to row by sampled segments.
fn plot_rows(rows: &Rows, gap: f64) -> anyhow::Result<TextPlot<f64>> {
    let mut plot = TextPlot::new().with_viewport(0., 0., 0., 0.);
    for (previous, current) in rows.iter().tuple_windows() {
        for (column, end) in current.iter() {
            let Some((_, start)) = previous.iter().find(|(c, _)| c == column) else {
                continue;
            };
            let marker = LINE_MARKERS[column % LINE_MARKERS.len()];
            plot.try_add_curve(Line::new(*start, *end), 0., 1., gap, marker)?;
        }
    }

    let markers = POINT_MARKERS.chars().collect::<Vec<_>>();
    for row in rows.iter() {
        for (column, point) in row.iter() {
            plot.add_point(*point, markers[column % markers.len()]);
        }
    }
    plot.fit(rows.iter().flatten().map(|(_, p)| p));
    Ok(plot)
}

/// Plot the columns of a whitespace or `sep` separated table.
pub fn plot(args: PlotArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.gap > 0. && args.gap <= 1.,
        "gap must lie in (0, 1], got {}",
        args.gap
    );

    let reader: Box<dyn BufRead> = match args.file {
        Some(ref path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {:?}.", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let rows = read_rows(reader, &args)?;
    debug!("read {} rows", rows.len());
    let plot = plot_rows(&rows, args.gap)?;

    println!(
        "{}",
        plot.try_render()
            .with_context(|| "Failed to render the input, is it empty?")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn args(xy: bool, cols: Vec<usize>, ignore_first: bool, sep: &str) -> PlotArgs {
        PlotArgs {
            file: None,
            xy,
            cols,
            ignore_first,
            sep: sep.to_string(),
            gap: 0.01,
        }
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(parse_row("  1 2.5   -3 ", " ").unwrap(), vec![1., 2.5, -3.]);
        assert_eq!(parse_row("1, 2,3", ",").unwrap(), vec![1., 2., 3.]);
        assert!(parse_row("", " ").unwrap().is_empty());
        assert!(parse_row("1 x 3", " ").is_err());
    }

    #[test]
    fn test_read_rows_by_line_number() {
        let input = "a b\n1 10\n\n2 20\n";
        let rows = read_rows(Cursor::new(input), &args(false, vec![], true, " ")).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![(0, Point2::new(2., 1.)), (1, Point2::new(2., 10.))],
                vec![(0, Point2::new(4., 2.)), (1, Point2::new(4., 20.))],
            ]
        );

        assert!(read_rows(Cursor::new(input), &args(false, vec![], false, " ")).is_err());
    }

    #[test]
    fn test_read_rows_xy_and_columns() {
        let input = "0;1;5;9\n1;2;6;8\n";
        let rows = read_rows(Cursor::new(input), &args(true, vec![2, 3], false, ";")).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![(2, Point2::new(0., 5.)), (3, Point2::new(0., 9.))],
                vec![(2, Point2::new(1., 6.)), (3, Point2::new(1., 8.))],
            ]
        );

        // the x column is never plotted against itself
        let rows = read_rows(Cursor::new(input), &args(true, vec![0], false, ";")).unwrap();
        assert!(rows.iter().all(|row| row.is_empty()));
    }

    #[test]
    fn test_plot_rows() {
        let input = "1 4\n2 3\n3 2\n";
        let rows = read_rows(Cursor::new(input), &args(false, vec![], false, " ")).unwrap();
        let plot = plot_rows(&rows, 0.1).unwrap();
        assert_eq!(plot.viewport(), (0., 3., 0., 4.));

        let text = plot.try_render().unwrap();
        let grid = text.lines().skip(1).collect::<String>();
        assert_eq!(grid.matches('A').count(), 3);
        assert_eq!(grid.matches('B').count(), 3);
        assert!(grid.contains('.'));
    }
}
