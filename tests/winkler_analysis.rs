use approx::assert_relative_eq;
use pile_solver::prelude::*;

fn pile() -> Pile {
    Pile::create("Tube", 0.0, vec![PileSection::new(40.0, 2.0, 0.08)]).unwrap()
}

fn sand_over_clay() -> SoilProfile {
    let sand = ApiSand::new([35.0, 33.0], SandKind::Static).unwrap();
    let clay = ApiClay::new([40.0, 80.0], [0.01, 0.005], ClayKind::Static).unwrap();
    SoilProfile::create(
        "Borehole",
        0.0,
        0.0,
        vec![
            Layer::new("Sand", 0.0, -20.0, 20.0).with_lateral_model(sand.into()),
            Layer::new("Clay", -20.0, -45.0, 19.0).with_lateral_model(clay.into()),
        ],
    )
    .unwrap()
}

fn soil_model(config: ModelConfig) -> PileModel {
    PileModel::create("Winkler", pile(), Some(sand_over_clay()), config).unwrap()
}

fn head_load(model: &PileModel, py: f64) -> BoundaryConditions {
    let mut bc = model.boundary_conditions();
    bc.set_pointload(0.0, PointLoad::py(py)).unwrap();
    bc.set_support(-40.0, Support::with_restraints(true, false, false)).unwrap();
    bc
}

#[test]
fn sand_over_clay_converges_within_capacity() {
    let model = soil_model(ModelConfig::default());
    let bc = head_load(&model, 500.0);
    let result = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap();

    assert!(result.converged);
    assert!(result.iterations >= 2 && result.iterations <= 100);
    assert_eq!(result.residuals.len(), result.iterations);
    assert!(result.residuals.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(result.name, "Winkler (Tube/Borehole)");

    let head = result.displacement_at(0.0).unwrap();
    assert!(head.deflection > 0.0);

    let mobilization = result.spring_mobilization.as_ref().unwrap();
    assert_eq!(mobilization.len(), 2 * model.mesh().elements.len());
    for row in mobilization {
        assert!(row.p_mobilized <= row.p_max + 1e-9, "{:?}", row);
    }
    assert!(mobilization.iter().any(|r| r.p_mobilized > 0.0));

    // no axial load, the tip restraint carries nothing
    assert!(result.reactions.is_empty());
    assert_relative_eq!(result.forces[0].v.abs(), 500.0, max_relative = 1e-3);
}

#[test]
fn residuals_never_grow_between_iterations() {
    let model = soil_model(ModelConfig::default());
    for py in [500.0, 2000.0, 5000.0] {
        let result = model
            .analyze_winkler(&head_load(&model, py), &AnalysisOptions::default())
            .unwrap();
        assert!(result.converged, "P = {}", py);
        assert!(
            result.residuals.windows(2).all(|w| w[1] <= w[0]),
            "P = {}: {:?}",
            py,
            result.residuals
        );
        assert!(result.residuals.len() >= 2, "P = {}", py);
    }
}

#[test]
fn larger_load_mobilizes_more_soil() {
    let model = soil_model(ModelConfig::default());
    let small = model
        .analyze_winkler(&head_load(&model, 200.0), &AnalysisOptions::default())
        .unwrap()
        .ensure_converged()
        .unwrap();
    let large = model
        .analyze_winkler(&head_load(&model, 1000.0), &AnalysisOptions::default())
        .unwrap()
        .ensure_converged()
        .unwrap();

    let d_small = small.displacement_at(0.0).unwrap().deflection;
    let d_large = large.displacement_at(0.0).unwrap().deflection;
    assert!(d_large > 5.0 * d_small);
}

#[test]
fn zero_load_converges_at_first_correction() {
    let model = soil_model(ModelConfig::default());
    let bc = head_load(&model, 0.0);
    let result = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap();

    assert!(result.converged);
    assert_eq!(result.iterations, 2);
    assert!(result.displacements.iter().all(|d| d.deflection == 0.0 && d.rotation == 0.0));
}

#[test]
fn single_iteration_is_never_converged() {
    let model = soil_model(ModelConfig::default());
    let bc = head_load(&model, 500.0);
    let options = AnalysisOptions::default().with_max_iter(1);
    let result = model.analyze_winkler(&bc, &options).unwrap();

    assert!(!result.converged);
    assert_eq!(result.iterations, 1);
    assert!(matches!(result.ensure_converged(), Err(PileError::ConvergenceFailed(1))));

    let err = model
        .analyze_winkler(&bc, &AnalysisOptions::default().with_max_iter(0))
        .unwrap_err();
    assert!(matches!(err, PileError::InvalidInput(_)));
}

#[test]
fn pile_without_springs_or_supports_fails() {
    let model = soil_model(ModelConfig::default().with_distributed_lateral(false));
    let mut bc = model.boundary_conditions();
    bc.set_pointload(0.0, PointLoad::py(100.0)).unwrap();

    let err = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, PileError::SystemFailure { iteration: 0 }));
}

#[test]
fn winkler_requires_soil_profile() {
    let model = PileModel::create("Bare", pile(), None, ModelConfig::default()).unwrap();
    let bc = model.boundary_conditions();
    let err = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, PileError::MissingSoilProfile));
}

#[test]
fn prescribed_head_deflection_is_kept() {
    let model = soil_model(ModelConfig::default());
    let mut bc = model.boundary_conditions();
    bc.set_pointdisplacement(0.0, PointDisplacement::ty(0.01)).unwrap();
    bc.set_support(-40.0, Support::with_restraints(true, false, false)).unwrap();

    let result = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap();
    assert!(result.converged);
    assert_relative_eq!(result.displacement_at(0.0).unwrap().deflection, 0.01, max_relative = 1e-12);

    let head = result.reaction_at(0.0).unwrap();
    assert!(head.vr > 0.0);
}

#[test]
fn concurrent_analyses_share_the_model() {
    let model = soil_model(ModelConfig::default().with_coarseness(1.0));
    let loads = [300.0, 600.0, 900.0];

    let sequential: Vec<f64> = loads
        .iter()
        .map(|&p| {
            let r = model.analyze_winkler(&head_load(&model, p), &AnalysisOptions::default()).unwrap();
            r.displacement_at(0.0).unwrap().deflection
        })
        .collect();

    let concurrent: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = loads
            .iter()
            .map(|&p| {
                let model = &model;
                s.spawn(move || {
                    let r = model.analyze_winkler(&head_load(model, p), &AnalysisOptions::default()).unwrap();
                    r.displacement_at(0.0).unwrap().deflection
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

fn tabulated_profile() -> SoilProfile {
    let py = SpringCurve::new(vec![0.0, 0.01, 0.05], vec![0.0, 500.0, 800.0]).unwrap();
    let mt = MtFamily::new(
        vec![0.0, 500.0],
        vec![
            SpringCurve::new(vec![0.0, 0.001, 0.01], vec![0.0, 100.0, 200.0]).unwrap(),
            SpringCurve::new(vec![0.0, 0.001, 0.01], vec![0.0, 50.0, 100.0]).unwrap(),
        ],
    )
    .unwrap();
    let hb = SpringCurve::new(vec![0.0, 0.02], vec![0.0, 300.0]).unwrap();
    let mb = SpringCurve::new(vec![0.0, 0.005], vec![0.0, 1000.0]).unwrap();

    let model = Tabulated::new(py).with_mt(mt).with_base_shear(hb).with_base_moment(mb);
    SoilProfile::create(
        "Tabulated",
        0.0,
        -5.0,
        vec![Layer::new("Soil", 0.0, -45.0, 18.0).with_lateral_model(model.into())],
    )
    .unwrap()
}

#[test]
fn tabulated_rotational_and_base_springs() {
    let config = ModelConfig::default()
        .with_coarseness(1.0)
        .with_distributed_moment(true)
        .with_base_shear(true)
        .with_base_moment(true);
    let model = PileModel::create("Tab", pile(), Some(tabulated_profile()), config).unwrap();

    let tables = model.spring_tables().unwrap();
    // user curves reach the model untouched
    let py = &model.py_springs().unwrap()[10][0];
    assert_eq!(py.displacements(), &[0.0, 0.01, 0.05]);
    assert_relative_eq!(py.resistance_at(0.01), 500.0);
    assert!(!tables.hb.is_zero());
    assert!(!tables.mb.is_zero());
    assert!(model.mt_springs().unwrap().iter().flatten().all(|f| !f.is_zero()));

    let mut bc = model.boundary_conditions();
    bc.set_pointload(0.0, PointLoad::new(0.0, 1000.0, 2000.0)).unwrap();
    bc.set_support(-40.0, Support::with_restraints(true, false, false)).unwrap();

    let result = model.analyze_winkler(&bc, &AnalysisOptions::default()).unwrap();
    assert!(result.converged);

    let hb = result.hb_mobilization.unwrap();
    let mb = result.mb_mobilization.unwrap();
    assert_relative_eq!(hb.maximum, 300.0, epsilon = 1e-9);
    assert_relative_eq!(mb.maximum, 1000.0, epsilon = 1e-9);
    assert!(hb.mobilized <= hb.maximum && mb.mobilized <= mb.maximum);

    let rows = result.spring_mobilization.unwrap();
    assert!(rows.iter().any(|r| r.m_mobilized > 0.0));
    for r in &rows {
        assert!(r.m_mobilized <= r.m_max + 1e-9);
        assert!(r.m_max >= 100.0 - 1e-9 && r.m_max <= 200.0 + 1e-9);
    }
}

#[test]
fn euler_bernoulli_and_timoshenko_agree_for_slender_piles() {
    let slender = || Pile::create("Slender", 0.0, vec![PileSection::new(40.0, 0.6, 0.02)]).unwrap();
    let run = |element_type| {
        let config = ModelConfig::default().with_element_type(element_type);
        let model = PileModel::create("M", slender(), Some(sand_over_clay()), config).unwrap();
        let result = model.analyze_winkler(&head_load(&model, 100.0), &AnalysisOptions::default()).unwrap();
        assert!(result.converged);
        result.displacement_at(0.0).unwrap().deflection
    };

    let eb = run(ElementType::EulerBernoulli);
    let timo = run(ElementType::Timoshenko);
    assert!(timo >= eb);
    assert_relative_eq!(timo, eb, max_relative = 0.05);
}
