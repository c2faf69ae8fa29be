use approx::assert_relative_eq;
use itertools::Itertools;
use nalgebra::Point2;

use crate::{error::Error, prelude::*};

fn crossing_lines() -> (Line<f64>, Line<f64>) {
    (
        Line::new(Point2::new(0., 0.), Point2::new(6., 10.)),
        Line::new(Point2::new(1., 6.), Point2::new(3., 2.)),
    )
}

fn seeded<F, G>(f: F, g: G, samples: usize) -> ParaSolver<f64, F, G>
where
    F: ParametricCurve<f64>,
    G: ParametricCurve<f64>,
{
    let mut solver = ParaSolver::new(f, g);
    solver.try_seed_regular(Side::F, 0., 1., samples).unwrap();
    solver.try_seed_regular(Side::G, 0., 1., samples).unwrap();
    solver
}

/// A line which can not be evaluated inside an open parameter interval.
struct Holed {
    line: Line<f64>,
    hole: (f64, f64),
}

impl ParametricCurve<f64> for Holed {
    fn try_point_at(&self, t: f64) -> anyhow::Result<Point2<f64>> {
        anyhow::ensure!(
            t <= self.hole.0 || self.hole.1 <= t,
            "no point at {} in the hole {:?}",
            t,
            self.hole
        );
        Ok(self.line.point_at(t))
    }
}

#[test]
fn seeding_creates_one_box_less_than_values() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(f, g);
    let created = solver.try_seed(Side::F, [0., 0.1, 0.4, 0.5, 1.]).unwrap();
    assert_eq!(created, 4);
    assert_eq!(solver.boxes(Side::F).len(), 4);
    assert_eq!(solver.samples(Side::F).len(), 5);
    assert!(solver.boxes(Side::G).is_empty());

    let created = solver.try_seed(Side::G, [0.5]).unwrap();
    assert_eq!(created, 0);
    assert_eq!(solver.samples(Side::G).len(), 1);
}

#[test]
fn seeding_from_a_sampler() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(&f, &g);
    let sampler = Sampler::try_new(&g, 0., 1., 0.25).unwrap();
    assert_eq!(solver.try_seed_sampler(Side::F, &sampler).unwrap(), 4);
    let parameters = solver.samples(Side::F).iter().map(|(t, _)| *t).collect_vec();
    assert_eq!(parameters, vec![0., 0.25, 0.5, 0.75, 1.]);

    let single = Sampler::try_new(&g, 0., 0.1, 0.5).unwrap();
    assert!(solver.try_seed_sampler(Side::G, &single).is_err());
    assert!(solver.samples(Side::G).is_empty());
}

#[test]
fn seeding_boxes_enclose_consecutive_samples() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(f, g);
    solver.try_seed(Side::G, [0., 0.5, 1.]).unwrap();
    let boxes = solver.boxes(Side::G);
    assert_eq!(boxes[0].start(), &Point2::new(1., 6.));
    assert_eq!(boxes[0].end(), &Point2::new(2., 4.));
    assert_eq!(
        boxes[0].rectangle(),
        &Rectangle::new(Point2::new(1., 4.), Point2::new(2., 6.))
    );
    assert_eq!(boxes[1].end(), &Point2::new(3., 2.));
}

#[test]
fn seeding_rejects_unordered_values() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(f, g);

    for values in [vec![], vec![0., 0.5, 0.5], vec![1., 0.], vec![0., f64::NAN]] {
        let err = solver.try_seed(Side::F, values).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidRange { .. })
        ));
    }
    assert!(solver.samples(Side::F).is_empty());
    assert!(solver.boxes(Side::F).is_empty());

    let err = solver.try_seed_regular(Side::F, 1., 0., 4).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidRange { .. })
    ));
}

#[test]
fn seeding_out_of_domain_leaves_state_untouched() {
    let square = Rectangle::new(Point2::new(0., 0.), Point2::new(1., 1.));
    let (f, _) = crossing_lines();
    let mut solver = ParaSolver::new(f, square);
    let err = solver.try_seed(Side::G, [0., 0.5, 1.5]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Domain { .. })
    ));
    assert!(solver.samples(Side::G).is_empty());
    assert!(solver.boxes(Side::G).is_empty());
}

#[test]
fn distant_curves_do_not_overlap() {
    let f = Line::new(Point2::new(0., 0.), Point2::new(1., 0.));
    let g = Line::new(Point2::new(0., 10.), Point2::new(1., 10.));
    let mut solver = seeded(f, g, 3);
    assert!(!solver.find_overlaps());
    assert!(solver.frontier().is_empty());
}

#[test]
fn refining_an_empty_frontier_is_a_noop() {
    let f = Line::new(Point2::new(0., 0.), Point2::new(1., 0.));
    let g = Line::new(Point2::new(0., 10.), Point2::new(1., 10.));
    let mut solver = seeded(f, g, 3);
    solver.find_overlaps();
    let samples = solver.samples(Side::F).len();
    assert!(solver.try_refine().unwrap().is_empty());
    assert_eq!(solver.samples(Side::F).len(), samples);
    assert_eq!(solver.boxes(Side::F).len(), 2);
}

#[test]
fn refinement_converges_on_crossing_lines() {
    let (f, g) = crossing_lines();
    let expected = Point2::new(24. / 11., 40. / 11.);
    let mut solver = seeded(f, g, 5);
    assert!(solver.find_overlaps());

    for _ in 0..4 {
        assert!(!solver.try_refine().unwrap().is_empty());
    }
    assert!(solver
        .frontier_boxes()
        .any(|(a, b)| a.rectangle().contains(&expected) && b.rectangle().contains(&expected)));

    for _ in 0..4 {
        solver.try_refine().unwrap();
    }
    assert!(solver.is_resolved(0.05));
    for (a, b) in solver.frontier_boxes() {
        assert!(a.rectangle().overlaps(b.rectangle()));
        assert!((a.rectangle().center() - expected).norm() < 0.05);
        assert!((b.rectangle().center() - expected).norm() < 0.05);
    }

    let (i, j) = solver.frontier()[0];
    let (t0, t1) = solver.try_box_parameters(Side::F, i).unwrap();
    let (s0, s1) = solver.try_box_parameters(Side::G, j).unwrap();
    assert!(t0 < t1 && s0 < s1);
    assert!((t0 - 4. / 11.).abs() < 0.05);
    assert!((s0 - 13. / 22.).abs() < 0.05);
}

#[test]
fn failed_refinement_leaves_state_untouched() {
    let (f, g) = crossing_lines();
    // the g box [0.5, 0.75] holding the crossing is bisected at 0.625
    let g = Holed {
        line: g,
        hole: (0.6, 0.65),
    };
    let mut solver = seeded(f, g, 5);
    assert!(solver.find_overlaps());
    assert!(solver.frontier().iter().any(|&(i, j)| i == 1 && j == 2));

    let snapshot = |solver: &ParaSolver<f64, Line<f64>, Holed>| {
        (
            solver.samples(Side::F).samples().to_vec(),
            solver.samples(Side::G).samples().to_vec(),
            solver.boxes(Side::F).to_vec(),
            solver.boxes(Side::G).to_vec(),
            solver.frontier().to_vec(),
        )
    };
    let before = snapshot(&solver);
    assert!(solver.try_refine().is_err());
    assert_eq!(snapshot(&solver), before);
    assert_eq!(solver.samples(Side::G).len(), 5);
    assert_eq!(solver.boxes(Side::F).len(), 4);
}

#[test]
fn refinement_logs_midpoints_and_appends_boxes() {
    let (f, g) = crossing_lines();
    let mut solver = seeded(f, g, 5);
    solver.find_overlaps();
    let f_parents = solver.frontier().iter().map(|&(i, _)| i).unique().count();
    let g_parents = solver.frontier().iter().map(|&(_, j)| j).unique().count();

    solver.try_refine().unwrap();
    assert_eq!(solver.samples(Side::F).len(), 5 + f_parents);
    assert_eq!(solver.samples(Side::G).len(), 5 + g_parents);
    assert_eq!(solver.boxes(Side::F).len(), 4 + 2 * f_parents);
    assert_eq!(solver.boxes(Side::G).len(), 4 + 2 * g_parents);
    assert!(solver
        .frontier()
        .iter()
        .all(|&(i, j)| i >= 4 && j >= 4));
}

#[test]
fn multiple_intersections_are_tracked_independently() {
    // a circle crossed by a horizontal diameter line
    let circle = ParaFunc::new(
        |t: f64| (t * std::f64::consts::TAU).cos(),
        |t: f64| (t * std::f64::consts::TAU).sin(),
    );
    let line = Line::new(Point2::new(-2., 0.1), Point2::new(2., 0.1));
    let mut solver = ParaSolver::new(circle, line);
    let intersections = solver
        .try_find_intersections((0., 0.9), (0., 1.), None)
        .unwrap();
    assert_eq!(intersections.len(), 2);

    let x = (1. - 0.1f64 * 0.1).sqrt();
    assert_relative_eq!(intersections[0].a().0, Point2::new(x, 0.1), epsilon = 1e-5);
    assert_relative_eq!(intersections[1].a().0, Point2::new(-x, 0.1), epsilon = 1e-5);
    assert!(intersections[0].a_parameter() < intersections[1].a_parameter());
}

#[test]
fn find_intersections_on_crossing_lines() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(&f, &g);
    let options = ParaSolverOptions::default()
        .with_seed_samples(5)
        .with_tolerance(1e-8);
    let intersections = solver
        .try_find_intersections((0., 1.), (0., 1.), Some(options))
        .unwrap();
    assert_eq!(intersections.len(), 1);

    let it = &intersections[0];
    assert_relative_eq!(it.a_parameter(), 4. / 11., epsilon = 1e-7);
    assert_relative_eq!(it.b_parameter(), 13. / 22., epsilon = 1e-7);
    assert_relative_eq!(it.midpoint(), Point2::new(24. / 11., 40. / 11.), epsilon = 1e-7);
    assert!(it.gap_squared() < 1e-12);
}

#[test]
fn find_intersections_without_crossing() {
    let f = Line::new(Point2::new(0., 0.), Point2::new(1., 0.));
    let g = Line::new(Point2::new(0., 10.), Point2::new(1., 10.));
    let mut solver = ParaSolver::new(f, g);
    let intersections = solver
        .try_find_intersections((0., 1.), (0., 1.), None)
        .unwrap();
    assert!(intersections.is_empty());
}

#[test]
fn find_intersections_reports_non_convergence() {
    let (f, g) = crossing_lines();
    let mut solver = ParaSolver::new(f, g);
    let options = ParaSolverOptions::default()
        .with_tolerance(1e-12)
        .with_max_rounds(3);
    let err = solver
        .try_find_intersections((0., 1.), (0., 1.), Some(options))
        .unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::NonConvergence { rounds, remaining }) => {
            assert_eq!(*rounds, 3);
            assert!(*remaining > 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn stale_lookup_is_reported() {
    let mut log = SampleLog::new();
    log.push(0., Point2::new(0., 0.));
    log.push(0.5, Point2::new(1., 1.));
    log.push(1., Point2::new(1., 1.));

    assert_eq!(log.try_find_parameter(&Point2::new(1., 1.), 1e-9).unwrap(), 0.5);
    assert_eq!(
        log.try_find_parameter(&Point2::new(1., 1.05), 0.1).unwrap(),
        0.5
    );
    let err = log
        .try_find_parameter(&Point2::new(2., 2.), 0.1)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::StaleLookup { x: 2., y: 2. })
    );
}
