//! Fan instance: orchestration of the per-timestep cycle.
//!
//! A `FanSystem` owns its validated configuration, one-shot sizing result,
//! override ports, and runtime state. `simulate` runs the full cycle for one
//! timestep: snapshot inputs, calculate (a pure function returning a value),
//! write the outlet node, emit report taps. The shared node is written in
//! exactly one place.

use crate::calc::{self, FanRuntimeState, SimRequest};
use crate::config::{FanConfiguration, ResolveContext};
use crate::error::{FanError, FanResult};
use crate::lifecycle::Lifecycle;
use crate::schema::FanDef;
use crate::sizing::{self, FanSizingResult, SizingService};
use ff_controls::{FanOverrides, ScheduleRegistry};
use ff_core::units::{w, Power, Time, TempInterval, VolumeRate, dk, m3ps};
use ff_core::{CurveId, NodeId, ScheduleId};
use ff_curves::CurveRegistry;
use ff_network::NodeStore;
use ff_results::ReportSink;

/// Type label used in design-value reports.
pub const FAN_TYPE: &str = "SystemFan";

/// Environment-level constants captured when a simulation environment begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub std_air_density_kg_m3: f64,
}

impl Environment {
    /// Dry air at 20 °C and sea-level pressure.
    pub fn standard() -> Self {
        Self {
            std_air_density_kg_m3: ff_air::standard_density(),
        }
    }

    /// Standard air at the given barometric pressure (site elevation).
    pub fn at_pressure(p_pa: f64) -> FanResult<Self> {
        let rho = ff_air::density_from_pressure_temperature_humidity(p_pa, 20.0, 0.0)?;
        Ok(Self {
            std_air_density_kg_m3: rho,
        })
    }
}

/// External services the fan consults during sizing and simulation.
pub struct FanServices<'a> {
    pub nodes: &'a mut NodeStore,
    pub curves: &'a CurveRegistry,
    pub schedules: &'a ScheduleRegistry,
    pub sizer: &'a dyn SizingService,
    pub sink: &'a mut dyn ReportSink,
}

/// One fan instance.
#[derive(Debug)]
pub struct FanSystem {
    cfg: FanConfiguration,
    lifecycle: Lifecycle,
    std_air_density_kg_m3: f64,
    sizing: Option<FanSizingResult>,
    runtime: FanRuntimeState,
    /// Externally writable override ports
    pub overrides: FanOverrides,
}

impl FanSystem {
    /// Validate a raw record and build the fan.
    ///
    /// # Errors
    /// `FanError::InvalidConfiguration` when any severe validation finding
    /// was recorded; no partially valid fan is ever returned.
    pub fn from_def(def: &FanDef, ctx: &mut ResolveContext<'_>) -> FanResult<Self> {
        let cfg = FanConfiguration::from_def(def, ctx)?;
        let num_speeds = cfg.num_speeds();
        Ok(Self {
            cfg,
            lifecycle: Lifecycle::Uninitialized,
            std_air_density_kg_m3: 0.0,
            sizing: None,
            runtime: FanRuntimeState {
                runtime_fraction_at_speed: vec![0.0; num_speeds],
                ..FanRuntimeState::default()
            },
            overrides: FanOverrides::default(),
        })
    }

    /// A simulation environment begins: capture its constants and reset the
    /// runtime state.
    ///
    /// The density is only captured before sizing; once design values are
    /// frozen, a new environment just resets the runtime state.
    pub fn begin_environment(&mut self, env: &Environment) {
        if !self.lifecycle.is_sized() {
            self.std_air_density_kg_m3 = env.std_air_density_kg_m3;
        }
        let num_speeds = self.cfg.num_speeds();
        self.runtime = FanRuntimeState {
            runtime_fraction_at_speed: vec![0.0; num_speeds],
            ..FanRuntimeState::default()
        };
        self.lifecycle = self.lifecycle.begin_environment();
    }

    /// Resolve design values, once.
    ///
    /// Idempotent: later calls are no-ops. Runs implicitly before the first
    /// simulate cycle and on demand from queries that need design values;
    /// either way the result appears fully computed or not at all.
    pub fn resolve_sizing(&mut self, services: &mut FanServices<'_>) -> FanResult<()> {
        if self.lifecycle.needs_environment() {
            self.begin_environment(&Environment::standard());
        }
        if self.sizing.is_some() {
            return Ok(());
        }
        let snapshot = self.overrides.snapshot();
        let result = sizing::resolve_sizing(
            &self.cfg,
            self.std_air_density_kg_m3,
            services.sizer,
            services.curves,
            snapshot.design_flow_m3_s,
            services.sink,
        )?;

        // Publish design flow bounds on the outlet node.
        let outlet = services.nodes.node_mut(self.cfg.outlet_node)?;
        outlet.mass_flow_max_kg_s = result.max_mass_flow_kg_s;
        outlet.mass_flow_min_kg_s = result.min_mass_flow_kg_s;

        self.sizing = Some(result);
        self.lifecycle = self.lifecycle.sizing_complete();
        Ok(())
    }

    /// Run one calculate → update → report cycle.
    pub fn simulate(
        &mut self,
        req: &SimRequest,
        dt: Time,
        services: &mut FanServices<'_>,
    ) -> FanResult<()> {
        self.resolve_sizing(services)?;
        let availability = services.schedules.value(self.cfg.availability)?;
        let overrides = self.overrides.snapshot();
        let inlet = services.nodes.node(self.cfg.inlet_node)?.clone();
        let power_curve = match self.cfg.power_curve {
            Some(id) => Some(services.curves.curve(id)?),
            None => None,
        };
        let sizing = self
            .sizing
            .as_ref()
            .ok_or_else(|| FanError::SizingRequired {
                name: self.cfg.name.clone(),
                what: "runtime calculation",
            })?;

        self.runtime = calc::calculate(
            &self.cfg,
            sizing,
            &inlet,
            req,
            availability,
            &overrides,
            power_curve,
        );

        self.update(services)?;
        self.report(dt, services.sink);
        self.lifecycle = self.lifecycle.first_cycle_complete();
        Ok(())
    }

    /// Write the computed outlet state to the shared node and publish the
    /// runtime taps. The single place the outlet node is mutated.
    fn update(&self, services: &mut FanServices<'_>) -> FanResult<()> {
        let inlet = services.nodes.node(self.cfg.inlet_node)?;
        let (quality, pressure, co2, contam) = (
            inlet.quality,
            inlet.p_pa,
            inlet.co2_ppm,
            inlet.generic_contam,
        );

        let outlet = services.nodes.node_mut(self.cfg.outlet_node)?;
        outlet.mass_flow_kg_s = self.runtime.outlet_mass_flow_kg_s;
        outlet.t_c = self.runtime.outlet_t_c;
        outlet.hum_rat = self.runtime.outlet_hum_rat;
        outlet.h_j_per_kg = self.runtime.outlet_h_j_per_kg;
        outlet.mass_flow_max_avail_kg_s = self.runtime.mass_flow_max_avail_kg_s;
        outlet.mass_flow_min_avail_kg_s = self.runtime.mass_flow_min_avail_kg_s;
        // Pass-through scalars the fan does not act on.
        outlet.quality = quality;
        outlet.p_pa = pressure;
        outlet.co2_ppm = co2;
        outlet.generic_contam = contam;

        services
            .sink
            .record_tap(&self.cfg.name, "Fan Electric Power [W]", self.runtime.power_w);
        services.sink.record_tap(
            &self.cfg.name,
            "Fan Runtime Fraction []",
            self.runtime
                .runtime_fraction_at_speed
                .last()
                .copied()
                .unwrap_or(0.0),
        );
        Ok(())
    }

    /// Derive the per-step report values.
    fn report(&mut self, dt: Time, sink: &mut dyn ReportSink) {
        self.runtime.energy_j = self.runtime.power_w * dt.value;
        self.runtime.delta_t_c = self.runtime.outlet_t_c - self.runtime.inlet_t_c;
        sink.record_tap(
            &self.cfg.name,
            "Fan Electric Energy [J]",
            self.runtime.energy_j,
        );
        sink.record_tap(
            &self.cfg.name,
            "Fan Rise in Air Temperature [deltaC]",
            self.runtime.delta_t_c,
        );
    }

    /// Rated air temperature rise at design conditions, independent of
    /// runtime state.
    ///
    /// # Errors
    /// `FanError::SizingRequired` before sizing has run; this query never
    /// forces sizing.
    pub fn design_temperature_rise(&self) -> FanResult<TempInterval> {
        let sizing = self.sizing.as_ref().ok_or_else(|| FanError::SizingRequired {
            name: self.cfg.name.clone(),
            what: "design temperature rise",
        })?;
        let cp = ff_air::specific_heat(0.0, 20.0);
        let motor_split = self.cfg.motor_efficiency
            + self.cfg.motor_in_air_fraction * (1.0 - self.cfg.motor_efficiency);
        let rise = self.cfg.pressure_rise.value
            / (sizing.std_air_density_kg_m3 * cp * sizing.total_efficiency)
            * motor_split;
        Ok(dk(rise))
    }

    /// Heat gain to the airstream at the given volume flow, using design
    /// pressure and efficiency. Forces sizing if it has not run yet.
    pub fn design_heat_gain(
        &mut self,
        volume_flow: VolumeRate,
        services: &mut FanServices<'_>,
    ) -> FanResult<Power> {
        self.resolve_sizing(services)?;
        let sizing = self.sizing.as_ref().ok_or_else(|| FanError::SizingRequired {
            name: self.cfg.name.clone(),
            what: "design heat gain",
        })?;
        let power = volume_flow.value * self.cfg.pressure_rise.value / sizing.total_efficiency;
        let shaft_power = self.cfg.motor_efficiency * power;
        Ok(w(shaft_power
            + (power - shaft_power) * self.cfg.motor_in_air_fraction))
    }

    pub fn name(&self) -> &str {
        &self.cfg.name
    }

    /// Current electric power draw.
    pub fn power(&self) -> Power {
        w(self.runtime.power_w)
    }

    /// Resolved design volume flow; `None` before sizing.
    pub fn design_volume_flow_rate(&self) -> Option<VolumeRate> {
        self.sizing.as_ref().map(|s| m3ps(s.design_flow_m3_s))
    }

    pub fn inlet_node(&self) -> NodeId {
        self.cfg.inlet_node
    }

    pub fn outlet_node(&self) -> NodeId {
        self.cfg.outlet_node
    }

    pub fn availability_schedule(&self) -> ScheduleId {
        self.cfg.availability
    }

    pub fn power_curve(&self) -> Option<CurveId> {
        self.cfg.power_curve
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn configuration(&self) -> &FanConfiguration {
        &self.cfg
    }

    /// Runtime state from the most recent cycle.
    pub fn runtime(&self) -> &FanRuntimeState {
        &self.runtime
    }
}
