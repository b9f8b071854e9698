/// WGSL shader for the lit, textured cube.
///
/// Bind groups: 0 pass constants, 1 object constants (dynamic offset),
/// 2 material constants (dynamic offset), 3 diffuse atlas and sampler. The
/// uniform structs mirror `rubix_render::constants` byte for byte.
pub const CUBE_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 16u;
const NUM_DIR_LIGHTS: u32 = 2u;
const NUM_POINT_LIGHTS: u32 = 1u;
const NUM_SPOT_LIGHTS: u32 = 1u;

struct Light {
    strength: vec3<f32>,
    falloff_start: f32,
    direction: vec3<f32>,
    falloff_end: f32,
    position: vec3<f32>,
    spot_power: f32,
};

struct PassConstants {
    view: mat4x4<f32>,
    inv_view: mat4x4<f32>,
    proj: mat4x4<f32>,
    inv_proj: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    eye_pos: vec3<f32>,
    pad0: f32,
    render_target_size: vec2<f32>,
    inv_render_target_size: vec2<f32>,
    near_z: f32,
    far_z: f32,
    total_time: f32,
    delta_time: f32,
    ambient_light: vec4<f32>,
    lights: array<Light, MAX_LIGHTS>,
};

struct ObjectConstants {
    world: mat4x4<f32>,
    tex_transform: mat4x4<f32>,
};

struct MaterialConstants {
    diffuse_albedo: vec4<f32>,
    fresnel_r0: vec3<f32>,
    roughness: f32,
    mat_transform: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> frame_pass: PassConstants;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

@group(2) @binding(0)
var<uniform> material: MaterialConstants;

@group(3) @binding(0)
var diffuse_map: texture_2d<f32>;
@group(3) @binding(1)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct SurfaceMaterial {
    albedo: vec4<f32>,
    fresnel_r0: vec3<f32>,
    shininess: f32,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = object.world * vec4<f32>(vertex.position, 1.0);
    let uv = material.mat_transform * (object.tex_transform * vec4<f32>(vertex.uv, 0.0, 1.0));

    var out: VertexOutput;
    out.clip_position = frame_pass.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    // Rigid transforms only, so the world matrix is fine for normals.
    out.world_normal = (object.world * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = uv.xy;
    return out;
}

fn attenuation(d: f32, falloff_start: f32, falloff_end: f32) -> f32 {
    return saturate((falloff_end - d) / (falloff_end - falloff_start));
}

fn schlick_fresnel(r0: vec3<f32>, normal: vec3<f32>, light_vec: vec3<f32>) -> vec3<f32> {
    let f0 = 1.0 - saturate(dot(normal, light_vec));
    return r0 + (1.0 - r0) * (f0 * f0 * f0 * f0 * f0);
}

fn blinn_phong(
    light_strength: vec3<f32>,
    light_vec: vec3<f32>,
    normal: vec3<f32>,
    to_eye: vec3<f32>,
    mat: SurfaceMaterial,
) -> vec3<f32> {
    let m = mat.shininess * 256.0;
    let half_vec = normalize(to_eye + light_vec);
    let roughness_factor = (m + 8.0) * pow(max(dot(half_vec, normal), 0.0), m) / 8.0;
    let fresnel = schlick_fresnel(mat.fresnel_r0, half_vec, light_vec);
    var spec_albedo = fresnel * roughness_factor;
    spec_albedo = spec_albedo / (spec_albedo + 1.0);
    return (mat.albedo.rgb + spec_albedo) * light_strength;
}

fn directional_light(light: Light, mat: SurfaceMaterial, normal: vec3<f32>, to_eye: vec3<f32>) -> vec3<f32> {
    let light_vec = normalize(-light.direction);
    let ndotl = max(dot(light_vec, normal), 0.0);
    return blinn_phong(light.strength * ndotl, light_vec, normal, to_eye, mat);
}

fn point_light(light: Light, mat: SurfaceMaterial, pos: vec3<f32>, normal: vec3<f32>, to_eye: vec3<f32>) -> vec3<f32> {
    var light_vec = light.position - pos;
    let d = length(light_vec);
    if (d > light.falloff_end) {
        return vec3<f32>(0.0);
    }
    light_vec = light_vec / d;
    let ndotl = max(dot(light_vec, normal), 0.0);
    let strength = light.strength * ndotl * attenuation(d, light.falloff_start, light.falloff_end);
    return blinn_phong(strength, light_vec, normal, to_eye, mat);
}

fn spot_light(light: Light, mat: SurfaceMaterial, pos: vec3<f32>, normal: vec3<f32>, to_eye: vec3<f32>) -> vec3<f32> {
    var light_vec = light.position - pos;
    let d = length(light_vec);
    if (d > light.falloff_end) {
        return vec3<f32>(0.0);
    }
    light_vec = light_vec / d;
    let ndotl = max(dot(light_vec, normal), 0.0);
    let spot = pow(max(dot(-light_vec, normalize(light.direction)), 0.0), light.spot_power);
    let strength = light.strength * ndotl * attenuation(d, light.falloff_start, light.falloff_end) * spot;
    return blinn_phong(strength, light_vec, normal, to_eye, mat);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuse = textureSample(diffuse_map, diffuse_sampler, in.uv) * material.diffuse_albedo;
    let normal = normalize(in.world_normal);
    let to_eye = normalize(frame_pass.eye_pos - in.world_pos);
    let mat = SurfaceMaterial(diffuse, material.fresnel_r0, 1.0 - material.roughness);

    var direct = vec3<f32>(0.0);
    for (var i = 0u; i < NUM_DIR_LIGHTS; i++) {
        direct += directional_light(frame_pass.lights[i], mat, normal, to_eye);
    }
    for (var i = NUM_DIR_LIGHTS; i < NUM_DIR_LIGHTS + NUM_POINT_LIGHTS; i++) {
        direct += point_light(frame_pass.lights[i], mat, in.world_pos, normal, to_eye);
    }
    let first_spot = NUM_DIR_LIGHTS + NUM_POINT_LIGHTS;
    for (var i = first_spot; i < first_spot + NUM_SPOT_LIGHTS; i++) {
        direct += spot_light(frame_pass.lights[i], mat, in.world_pos, normal, to_eye);
    }

    let ambient = frame_pass.ambient_light * diffuse;
    return vec4<f32>(ambient.rgb + direct, diffuse.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rubix_scene::lights::{
        MAX_LIGHTS, NUM_DIRECTIONAL_LIGHTS, NUM_POINT_LIGHTS, NUM_SPOT_LIGHTS,
    };

    #[test]
    fn light_counts_match_the_rig() {
        assert!(CUBE_SHADER.contains(&format!("MAX_LIGHTS: u32 = {MAX_LIGHTS}u")));
        assert!(CUBE_SHADER.contains(&format!("NUM_DIR_LIGHTS: u32 = {NUM_DIRECTIONAL_LIGHTS}u")));
        assert!(CUBE_SHADER.contains(&format!("NUM_POINT_LIGHTS: u32 = {NUM_POINT_LIGHTS}u")));
        assert!(CUBE_SHADER.contains(&format!("NUM_SPOT_LIGHTS: u32 = {NUM_SPOT_LIGHTS}u")));
    }

    #[test]
    fn entry_points_present() {
        assert!(CUBE_SHADER.contains("fn vs_main"));
        assert!(CUBE_SHADER.contains("fn fs_main"));
    }
}
